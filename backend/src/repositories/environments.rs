//! Environment repository

use super::{lifecycle_document, Repository};
use apiboy_shared::Environment;

lifecycle_document!(Environment, "environments", "env");

pub type EnvironmentRepository = Repository<Environment>;
