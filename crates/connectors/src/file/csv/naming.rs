use model::window::Window;

/// How export files are named for a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileNaming {
    /// `<prefix>_<start>_to_<end>.csv`
    Prefixed { prefix: String },
    /// `<start>_to_<end>.csv`
    IntervalOnly,
}

impl FileNaming {
    pub fn from_prefix(prefix: Option<&str>) -> Self {
        match prefix.map(str::trim) {
            Some(p) if !p.is_empty() => FileNaming::Prefixed {
                prefix: p.to_string(),
            },
            _ => FileNaming::IntervalOnly,
        }
    }

    pub fn file_name(&self, window: &Window) -> String {
        match self {
            FileNaming::Prefixed { prefix } => format!("{prefix}_{}.csv", window.suffix()),
            FileNaming::IntervalOnly => format!("{}.csv", window.suffix()),
        }
    }
}

impl Default for FileNaming {
    fn default() -> Self {
        FileNaming::Prefixed {
            prefix: "measurements".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window() -> Window {
        Window {
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
        }
    }

    #[test]
    fn test_prefixed_name() {
        assert_eq!(
            FileNaming::default().file_name(&window()),
            "measurements_2020-01-01_to_2020-01-02.csv"
        );
    }

    #[test]
    fn test_blank_prefix_means_interval_only() {
        let naming = FileNaming::from_prefix(Some("  "));
        assert_eq!(naming, FileNaming::IntervalOnly);
        assert_eq!(naming.file_name(&window()), "2020-01-01_to_2020-01-02.csv");
    }
}
