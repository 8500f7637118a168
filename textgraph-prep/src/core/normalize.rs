//! Raw text cleaning applied before tokenization.
//!
//! Steps, in order: trim and collapse whitespace, transliterate to ASCII,
//! expand acronyms, lowercase. Acronym patterns are compiled once per
//! normalizer and applied in key order, so the result does not depend on map
//! iteration order.

use crate::config::model::TextConfig;
use crate::errors::{GraphPrepError, GraphPrepResult};
use regex::{NoExpand, Regex};

#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    transliterate: bool,
    lowercase: bool,
    acronyms: Vec<(Regex, String)>,
}

impl TextNormalizer {
    /// Compile one case-insensitive whole-word pattern per acronym.
    ///
    /// # Errors
    /// [`GraphPrepError::Config`] for an empty acronym key or a pattern the regex
    /// engine rejects.
    pub fn from_config(cfg: &TextConfig) -> GraphPrepResult<Self> {
        let acronyms = cfg
            .acronyms
            .iter()
            .map(|(acronym, expansion)| {
                if acronym.trim().is_empty() {
                    return Err(GraphPrepError::Config("empty acronym key".into()));
                }
                let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(acronym.trim())))
                    .map_err(|e| GraphPrepError::Config(format!("acronym `{acronym}`: {e}")))?;
                Ok((re, expansion.clone()))
            })
            .collect::<GraphPrepResult<Vec<_>>>()?;

        Ok(Self {
            transliterate: cfg.transliterate,
            lowercase: cfg.lowercase,
            acronyms,
        })
    }

    pub fn process(&self, text: &str) -> String {
        let mut out = collapse_whitespace(text);
        if self.transliterate {
            out = deunicode::deunicode(&out);
        }
        for (re, expansion) in &self.acronyms {
            out = re.replace_all(&out, NoExpand(expansion.as_str())).into_owned();
        }
        if self.lowercase {
            out = out.to_lowercase();
        }
        out
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
