//! Recipe files: a replacement described as data
//!
//! ```toml
//! target = "app/Http/Controllers/Accountant/PayableController.php"
//! start_marker = "return Inertia::render('AccountantPage/Payables', ["
//! end_delimiter = "]);"
//! replacement_file = "payables_block.php.txt"
//! ```
//!
//! Relative `target` and `replacement_file` paths resolve against the
//! directory holding the recipe.

use serde::{Deserialize, Serialize};
use splice_content::BlockPattern;
use splice_fs::{ConfigStore, NormalizedPath, io};
use tracing::debug;

use crate::replacer::ReplaceRequest;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    pub target: String,
    pub start_marker: String,
    pub end_delimiter: String,
    /// Inline payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    /// Payload read from a file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement_file: Option<String>,
}

impl Recipe {
    /// Load a recipe file (TOML, JSON or YAML by extension).
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }

    /// Turn the recipe into a request, resolving paths against `base_dir`.
    ///
    /// `origin` names the recipe in error messages.
    pub fn into_request(self, base_dir: &NormalizedPath, origin: &NormalizedPath) -> Result<ReplaceRequest> {
        let pattern = BlockPattern::new(self.start_marker, self.end_delimiter)
            .map_err(|e| Error::invalid_recipe(origin.to_native(), e.to_string()))?;

        let replacement = match (self.replacement, self.replacement_file) {
            (Some(inline), None) => inline,
            (None, Some(file)) => {
                let payload_path = NormalizedPath::new(file).resolve_against(base_dir);
                debug!(payload = %payload_path, "reading replacement payload");
                io::read_text(&payload_path)?
            }
            (Some(_), Some(_)) => {
                return Err(Error::invalid_recipe(
                    origin.to_native(),
                    "set either `replacement` or `replacement_file`, not both",
                ));
            }
            (None, None) => {
                return Err(Error::invalid_recipe(
                    origin.to_native(),
                    "one of `replacement` or `replacement_file` is required",
                ));
            }
        };

        let target = NormalizedPath::new(self.target).resolve_against(base_dir);
        Ok(ReplaceRequest::new(target, pattern, replacement))
    }
}

/// Load a recipe file and resolve it into a request.
pub fn load_request(recipe_path: impl Into<NormalizedPath>) -> Result<ReplaceRequest> {
    let recipe_path = recipe_path.into();
    let base_dir = recipe_path
        .parent()
        .unwrap_or_else(|| NormalizedPath::new(""));
    Recipe::load(&recipe_path)?.into_request(&base_dir, &recipe_path)
}
