use crate::core::enumerator::{EnumerationStrategy, PercentileSample};
use crate::core::filter::FilterSpec;
use crate::core::scorer::MAX_TRAP_SCORE;
use crate::domain::model::{
    Combo, DigitPools, DigitSet, FilterName, OutputFormat, PoolKind, TrapInputs,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, TrapError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn parse_seed(text: &str) -> Result<Combo> {
    text.trim().parse()
}

/// Comma-separated digits. Blank or non-numeric tokens are skipped;
/// numbers outside 0-9 are rejected.
pub fn parse_digit_list(pool: PoolKind, text: &str) -> Result<DigitSet> {
    let mut digits = DigitSet::EMPTY;
    for token in text.split(',').map(str::trim) {
        if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        match token.parse::<u8>() {
            Ok(d) if d <= 9 => digits.insert(d),
            _ => {
                return Err(TrapError::InvalidDigit {
                    pool: pool.to_string(),
                    token: token.to_string(),
                })
            }
        }
    }
    Ok(digits)
}

pub fn validate_pool_size(pool: PoolKind, digits: DigitSet) -> Result<()> {
    let size = digits.len();
    let (ok, requirement) = match pool {
        PoolKind::Hot | PoolKind::Cold => (size >= 3, "at least 3 required"),
        PoolKind::Due => ((2..=5).contains(&size), "must be between 2 and 5"),
    };
    if ok {
        Ok(())
    } else {
        Err(TrapError::InsufficientPool {
            pool: pool.to_string(),
            size,
            requirement: requirement.to_string(),
        })
    }
}

pub fn parse_pools(hot: &str, cold: &str, due: &str) -> Result<DigitPools> {
    let pools = DigitPools {
        hot: parse_digit_list(PoolKind::Hot, hot)?,
        cold: parse_digit_list(PoolKind::Cold, cold)?,
        due: parse_digit_list(PoolKind::Due, due)?,
    };
    for kind in [PoolKind::Hot, PoolKind::Cold, PoolKind::Due] {
        validate_pool_size(kind, pools.get(kind))?;
    }
    Ok(pools)
}

/// Duplicate selections collapse to the first occurrence.
pub fn parse_filters(names: &[String]) -> Result<Vec<FilterName>> {
    let mut selected = Vec::new();
    for name in names.iter().filter(|n| !n.trim().is_empty()) {
        let filter: FilterName = name.parse()?;
        if !selected.contains(&filter) {
            selected.push(filter);
        }
    }
    Ok(selected)
}

pub fn parse_strategy(name: &str, retention: f64, sample_seed: u64) -> Result<EnumerationStrategy> {
    match name.trim().to_lowercase().replace('_', "-").as_str() {
        "reduced" | "reduced-cross-product" => Ok(EnumerationStrategy::ReducedCrossProduct),
        "two-stage" | "two-stage-intersect" => {
            validate_retention("retention", retention)?;
            Ok(EnumerationStrategy::TwoStageIntersect(PercentileSample {
                retention,
                seed: sample_seed,
            }))
        }
        other => Err(TrapError::InvalidConfigValueError {
            field: "strategy".to_string(),
            value: other.to_string(),
            reason: "Valid strategies: reduced, two-stage".to_string(),
        }),
    }
}

pub fn validate_retention(field_name: &str, retention: f64) -> Result<()> {
    if retention.is_nan() || retention <= 0.0 || retention > 1.0 {
        return Err(TrapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: retention.to_string(),
            reason: "Retention must be greater than 0 and at most 1".to_string(),
        });
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(TrapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(TrapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(TrapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn parse_formats(formats: &[String]) -> Result<Vec<OutputFormat>> {
    if formats.is_empty() {
        return Err(TrapError::MissingConfigError {
            field: "output_formats".to_string(),
        });
    }
    let mut parsed = Vec::new();
    for format in formats {
        let format = OutputFormat::parse(format)?;
        if !parsed.contains(&format) {
            parsed.push(format);
        }
    }
    Ok(parsed)
}

/// Everything the engine needs, parsed and checked.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub inputs: TrapInputs,
    pub strategy: EnumerationStrategy,
    pub filters: FilterSpec,
    pub formats: Vec<OutputFormat>,
}

impl RunRequest {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let seed = parse_seed(config.seed())?;
        let pools = parse_pools(config.hot_digits(), config.cold_digits(), config.due_digits())?;
        let strategy = parse_strategy(config.strategy(), config.retention(), config.sample_seed())?;
        validate_range("threshold", config.threshold(), 0, MAX_TRAP_SCORE)?;
        let selected = parse_filters(config.filters())?;
        validate_path("output_path", config.output_path())?;
        let formats = parse_formats(config.output_formats())?;

        Ok(Self {
            inputs: TrapInputs { seed, pools },
            strategy,
            filters: FilterSpec::new(selected, config.threshold()),
            formats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed() {
        assert_eq!(parse_seed(" 13579 ").unwrap().to_string(), "13579");
        assert!(matches!(
            parse_seed("1357"),
            Err(TrapError::MalformedSeed { .. })
        ));
        assert!(matches!(
            parse_seed("1357x"),
            Err(TrapError::MalformedSeed { .. })
        ));
    }

    #[test]
    fn test_parse_digit_list_skips_noise() {
        let set = parse_digit_list(PoolKind::Hot, "0, 5,,x, 9 ,-1").unwrap();
        assert_eq!(set.to_vec(), vec![0, 5, 9]);
    }

    #[test]
    fn test_parse_digit_list_rejects_multi_digit_numbers() {
        let err = parse_digit_list(PoolKind::Cold, "2,3,12").unwrap_err();
        assert!(matches!(err, TrapError::InvalidDigit { ref token, .. } if token == "12"));
    }

    #[test]
    fn test_pool_bounds_name_the_pool() {
        let err = parse_pools("0,5", "2,3,7", "1,4").unwrap_err();
        assert!(err.to_string().contains("Hot"));

        let err = parse_pools("0,5,9", "2,3,7", "1").unwrap_err();
        assert!(err.to_string().contains("Due"));
        assert!(err.to_string().contains("between 2 and 5"));

        let err = parse_pools("0,5,9", "2,3,7", "1,2,3,4,5,6").unwrap_err();
        assert!(matches!(err, TrapError::InsufficientPool { size: 6, .. }));

        // repeated digits count once
        assert!(parse_pools("0,0,5", "2,3,7", "1,4").is_err());
        assert!(parse_pools("0,5,9", "2,3,7", "1,4").is_ok());
    }

    #[test]
    fn test_parse_filters_dedups() {
        let names = vec![
            "hot".to_string(),
            "Hot Digit Match".to_string(),
            "F2: Spread < 4".to_string(),
        ];
        assert_eq!(
            parse_filters(&names).unwrap(),
            vec![FilterName::HotMatch, FilterName::Spread]
        );
        assert!(parse_filters(&["nope".to_string()]).is_err());
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!(
            parse_strategy("reduced", 0.952, 42).unwrap(),
            EnumerationStrategy::ReducedCrossProduct
        );
        assert!(matches!(
            parse_strategy("two_stage", 0.5, 9).unwrap(),
            EnumerationStrategy::TwoStageIntersect(PercentileSample { seed: 9, .. })
        ));
        assert!(parse_strategy("two-stage", 0.0, 42).is_err());
        assert!(parse_strategy("two-stage", 1.5, 42).is_err());
        assert!(parse_strategy("random", 0.9, 42).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("threshold", 8u8, 0, 8).is_ok());
        assert!(validate_range("threshold", 9u8, 0, 8).is_err());
    }

    #[test]
    fn test_parse_formats() {
        let formats = vec!["csv".to_string(), "json".to_string(), "CSV".to_string()];
        assert_eq!(
            parse_formats(&formats).unwrap(),
            vec![OutputFormat::Csv, OutputFormat::Json]
        );
        assert!(parse_formats(&[]).is_err());
    }
}
