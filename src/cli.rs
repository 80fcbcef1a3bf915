use std::path::PathBuf;

use clap::Parser;

use crate::catalog::Category;
use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "nearby", version, about = "Find and book local services from the terminal")]
pub struct Args {
    /// Neighborhood text to filter descriptions by (e.g. "Moema")
    #[arg(short, long)]
    pub neighborhood: Option<String>,

    /// Search radius: 1km, 2km or 5km
    #[arg(short, long)]
    pub radius: Option<String>,

    /// Service category: "atHome" or "sidewalk"
    #[arg(short, long)]
    pub category: Option<Category>,

    /// Run as a platform without map or location support
    #[arg(long)]
    pub no_map: bool,

    /// Print the filtered services as JSON and exit
    #[arg(long)]
    pub list: bool,

    /// Config file to load instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Layer the command-line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(neighborhood) = &self.neighborhood {
            config.filters.neighborhood.clone_from(neighborhood);
        }
        if let Some(radius) = &self.radius {
            config.filters.radius.clone_from(radius);
        }
        if let Some(category) = self.category {
            config.filters.category = category;
        }
        if self.no_map {
            config.platform.map = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Platform;

    #[test]
    fn test_overrides_replace_config_values() {
        let args = Args::parse_from([
            "nearby",
            "--neighborhood",
            "moema",
            "-r",
            "2km",
            "--category",
            "sidewalk",
            "--no-map",
        ]);
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.filters.neighborhood, "moema");
        assert_eq!(config.filters.radius, "2km");
        assert_eq!(config.filters.category, Category::Sidewalk);
        assert_eq!(config.platform.platform(), Platform::Static);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = Args::parse_from(["nearby"]);
        let mut config = AppConfig::default();
        config.filters.radius = "5km".to_string();
        args.apply(&mut config);

        assert_eq!(config.filters.radius, "5km");
        assert!(config.platform.map);
        assert!(!args.list);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        assert!(Args::try_parse_from(["nearby", "--category", "rooftop"]).is_err());
    }
}
