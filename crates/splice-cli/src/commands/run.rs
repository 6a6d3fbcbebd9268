//! Run command implementation

use std::path::Path;

use tracing::debug;

use super::apply::execute;
use crate::cli::WriteArgs;
use crate::error::Result;

/// Run the replacement described by a recipe file
pub fn run_recipe(recipe: &Path, write: &WriteArgs) -> Result<()> {
    let request = splice_core::load_request(recipe)?;
    debug!(recipe = %recipe.display(), target = %request.path, "loaded recipe");
    execute(&request, write)
}
