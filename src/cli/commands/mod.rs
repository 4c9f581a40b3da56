pub mod auth;
pub mod locker;
pub mod private;
pub mod resource;
pub mod server;

use clap::Args;

/// List filters shared by `resource list` and `private list`
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    #[arg(long = "type", help = "Only resources of this type (note, link, video, document, command)")]
    pub resource_type: Option<String>,
    #[arg(long, help = "Only resources carrying this tag")]
    pub tag: Option<String>,
    #[arg(long, help = "Only resources in this category")]
    pub category: Option<String>,
    #[arg(long, help = "Case-insensitive search over title and content")]
    pub q: Option<String>,
}

impl FilterArgs {
    pub fn to_query(&self) -> Vec<(&'static str, &str)> {
        let mut query = Vec::new();
        if let Some(v) = &self.resource_type {
            query.push(("type", v.as_str()));
        }
        if let Some(v) = &self.tag {
            query.push(("tag", v.as_str()));
        }
        if let Some(v) = &self.category {
            query.push(("category", v.as_str()));
        }
        if let Some(v) = &self.q {
            query.push(("q", v.as_str()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_query_skips_unset_fields() {
        let filter = FilterArgs {
            resource_type: Some("link".to_string()),
            q: Some("ownership".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.to_query(), vec![("type", "link"), ("q", "ownership")]);
        assert!(FilterArgs::default().to_query().is_empty());
    }
}
