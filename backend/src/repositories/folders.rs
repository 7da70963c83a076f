//! Folder repository

use super::{lifecycle_document, Repository};
use apiboy_shared::Folder;

lifecycle_document!(Folder, "folders", "fol");

pub type FolderRepository = Repository<Folder>;
