//! Saved request repository

use super::{lifecycle_document, Repository};
use apiboy_shared::Request;

lifecycle_document!(Request, "requests", "req");

pub type RequestRepository = Repository<Request>;
