//! Configuration management for the order-sheet extractor
//!
//! Every knob is injected at construction time. Nothing here is global: the
//! pipeline is built from a `Config` value and keeps its own copy.

use std::env;
use std::path::PathBuf;

use crate::extract::{ColorContextPolicy, QuantityLineGate, DEFAULT_SIZE_LABELS};
use crate::ocr::MAX_SCALE;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub ocr: OcrConfig,
    pub preprocess: PreprocessConfig,
    pub extraction: ExtractionConfig,
    pub service: ServiceConfig,
}

/// OCR engine location and language profile
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Tesseract executable (absolute path or a name on PATH)
    pub tesseract_cmd: PathBuf,
    /// Tesseract language profile, Korean + English unless overridden
    pub languages: String,
    /// Directory holding the `.traineddata` files
    pub tessdata_dir: Option<PathBuf>,
    /// OCR engine mode (`--oem`)
    pub oem: u8,
    /// Page segmentation mode (`--psm`)
    pub psm: u8,
}

#[derive(Debug, Clone, Default)]
pub struct PreprocessConfig {
    /// Resize factor applied after grayscale conversion, at most `MAX_SCALE`
    pub scale: Option<f32>,
    /// Contrast adjustment passed to `imageops::contrast`
    pub contrast: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Size labels assigned positionally to the per-size quantities
    pub size_labels: Vec<String>,
    pub color_context: ColorContextPolicy,
    pub quantity_gate: QuantityLineGate,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Upper bound for one extraction when run through `OrderSheetService`
    pub timeout_secs: Option<u64>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        OcrConfig {
            tesseract_cmd: PathBuf::from("tesseract"),
            languages: "kor+eng".to_string(),
            tessdata_dir: None,
            oem: 3,
            psm: 3,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig {
            size_labels: DEFAULT_SIZE_LABELS.iter().map(|s| s.to_string()).collect(),
            color_context: ColorContextPolicy::default(),
            quantity_gate: QuantityLineGate::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ocr: OcrConfig::default(),
            preprocess: PreprocessConfig::default(),
            extraction: ExtractionConfig::default(),
            service: ServiceConfig::default(),
        }
    }
}

impl Config {
    /// Build a configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let ocr = OcrConfig {
            tesseract_cmd: lookup("TESSERACT_CMD")
                .map(PathBuf::from)
                .unwrap_or(defaults.ocr.tesseract_cmd),
            languages: lookup("OCR_LANGUAGES").unwrap_or(defaults.ocr.languages),
            tessdata_dir: lookup("TESSDATA_DIR").map(PathBuf::from),
            oem: parse_var(&lookup, "OCR_OEM")?.unwrap_or(defaults.ocr.oem),
            psm: parse_var(&lookup, "OCR_PSM")?.unwrap_or(defaults.ocr.psm),
        };

        let scale: Option<f32> = parse_var(&lookup, "PREPROCESS_SCALE")?;
        if let Some(factor) = scale {
            if !(factor.is_finite() && factor > 0.0 && factor <= MAX_SCALE) {
                return Err(ConfigError::InvalidValue {
                    key: "PREPROCESS_SCALE",
                    value: factor.to_string(),
                });
            }
        }

        let preprocess = PreprocessConfig {
            scale,
            contrast: parse_var(&lookup, "PREPROCESS_CONTRAST")?,
        };

        let size_labels = match lookup("SIZE_LABELS") {
            Some(raw) => {
                let labels: Vec<String> = raw
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if labels.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: "SIZE_LABELS",
                        value: raw,
                    });
                }
                labels
            }
            None => defaults.extraction.size_labels,
        };

        let color_context = match parse_var::<bool, _>(&lookup, "STRICT_COLOR_CONTEXT")? {
            Some(true) => ColorContextPolicy::ClearAfterRecord,
            Some(false) => ColorContextPolicy::Carry,
            None => defaults.extraction.color_context,
        };

        let quantity_gate = match lookup("QUANTITY_LINE_GATE") {
            Some(raw) => match raw.trim() {
                "size-token-or-numeric-row" => QuantityLineGate::SizeTokenOrNumericRow,
                "size-token" => QuantityLineGate::SizeTokenOnly,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "QUANTITY_LINE_GATE",
                        value: raw,
                    })
                }
            },
            None => defaults.extraction.quantity_gate,
        };

        Ok(Config {
            ocr,
            preprocess,
            extraction: ExtractionConfig {
                size_labels,
                color_context,
                quantity_gate,
            },
            service: ServiceConfig {
                timeout_secs: parse_var(&lookup, "EXTRACT_TIMEOUT_SECS")?,
            },
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.ocr.tesseract_cmd, PathBuf::from("tesseract"));
        assert_eq!(config.ocr.languages, "kor+eng");
        assert_eq!(config.ocr.psm, 3);
        assert!(config.preprocess.scale.is_none());
        assert!(config.preprocess.contrast.is_none());
        assert_eq!(
            config.extraction.size_labels,
            vec!["230", "235", "240", "245", "250"]
        );
        assert_eq!(config.extraction.color_context, ColorContextPolicy::Carry);
        assert_eq!(
            config.extraction.quantity_gate,
            QuantityLineGate::SizeTokenOrNumericRow
        );
        assert!(config.service.timeout_secs.is_none());
    }

    #[test]
    fn test_overrides_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("TESSERACT_CMD", "/opt/tesseract/bin/tesseract"),
            ("TESSDATA_DIR", "/opt/tessdata"),
            ("OCR_PSM", "6"),
            ("PREPROCESS_SCALE", "1.5"),
            ("SIZE_LABELS", "220, 225,230"),
            ("STRICT_COLOR_CONTEXT", "true"),
            ("QUANTITY_LINE_GATE", "size-token"),
            ("EXTRACT_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(
            config.ocr.tesseract_cmd,
            PathBuf::from("/opt/tesseract/bin/tesseract")
        );
        assert_eq!(config.ocr.tessdata_dir, Some(PathBuf::from("/opt/tessdata")));
        assert_eq!(config.ocr.psm, 6);
        assert_eq!(config.preprocess.scale, Some(1.5));
        assert_eq!(config.extraction.size_labels, vec!["220", "225", "230"]);
        assert_eq!(
            config.extraction.color_context,
            ColorContextPolicy::ClearAfterRecord
        );
        assert_eq!(config.extraction.quantity_gate, QuantityLineGate::SizeTokenOnly);
        assert_eq!(config.service.timeout_secs, Some(30));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[("OCR_PSM", "auto")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "OCR_PSM", .. }));

        let err = Config::from_lookup(lookup_from(&[("SIZE_LABELS", " , ")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "SIZE_LABELS", .. }));

        for scale in ["0", "-2", "1e9", "NaN"] {
            let err =
                Config::from_lookup(lookup_from(&[("PREPROCESS_SCALE", scale)])).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue {
                    key: "PREPROCESS_SCALE",
                    ..
                }
            ));
        }

        let err =
            Config::from_lookup(lookup_from(&[("QUANTITY_LINE_GATE", "loose")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "QUANTITY_LINE_GATE",
                ..
            }
        ));
    }
}
