//! Owner/category filtering shared by the list and edit screens.

use crate::models::Lead;

/// Label of the category option that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// Current filter inputs. Both conditions must hold for a lead to match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilter {
    /// Case-insensitive substring of the owner name; blank matches everything.
    pub owner_query: String,
    /// `None` means "All".
    pub category: Option<String>,
}

impl LeadFilter {
    pub fn matches(&self, lead: &Lead) -> bool {
        let query = self.owner_query.to_lowercase();
        let owner_ok = query.is_empty() || lead.owner_name.to_lowercase().contains(&query);
        let category_ok = self
            .category
            .as_ref()
            .map_or(true, |category| lead.category == *category);
        owner_ok && category_ok
    }

    pub fn apply<'a>(&self, leads: &'a [Lead]) -> Vec<&'a Lead> {
        leads.iter().filter(|lead| self.matches(lead)).collect()
    }

    /// Move the category selection through `All` followed by `categories`.
    /// A selection that disappeared from the snapshot falls back to `All`.
    pub fn cycle_category(&mut self, categories: &[String], offset: isize) {
        let options = categories.len() as isize + 1;
        let current = match &self.category {
            None => 0,
            Some(selected) => categories
                .iter()
                .position(|c| c == selected)
                .map_or(0, |idx| idx as isize + 1),
        };
        let next = (current + offset).rem_euclid(options);
        self.category = if next == 0 {
            None
        } else {
            Some(categories[next as usize - 1].clone())
        };
    }

    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(ALL_CATEGORIES)
    }
}

/// Options shown in the category selector: "All" plus the given categories.
pub fn category_options(categories: &[String]) -> Vec<String> {
    std::iter::once(ALL_CATEGORIES.to_string())
        .chain(categories.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lead;

    fn leads() -> Vec<Lead> {
        vec![
            lead(1, "Ramesh Kumar", "Kothi/Villa", "Sector 14"),
            lead(2, "Suresh", "Builder floor", "Sector 14"),
            lead(3, "Param Singh", "Builder floor", "Sector 21"),
        ]
    }

    #[test]
    fn owner_query_is_case_insensitive_substring() {
        let filter = LeadFilter {
            owner_query: "ram".into(),
            category: None,
        };
        let ids: Vec<i64> = filter.apply(&leads()).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn all_returns_everything() {
        let data = leads();
        assert_eq!(LeadFilter::default().apply(&data).len(), data.len());
    }

    #[test]
    fn category_is_exact_and_composes_with_owner() {
        let data = leads();
        let mut filter = LeadFilter {
            owner_query: String::new(),
            category: Some("Builder floor".into()),
        };
        let ids: Vec<i64> = filter.apply(&data).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2, 3]);

        filter.owner_query = "RAM".into();
        let ids: Vec<i64> = filter.apply(&data).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3]);

        filter.category = Some("Builder".into());
        filter.owner_query.clear();
        assert!(filter.apply(&data).is_empty());
    }

    #[test]
    fn cycling_wraps_through_all() {
        let categories = vec!["Builder floor".to_string(), "Kothi/Villa".to_string()];
        let mut filter = LeadFilter::default();

        filter.cycle_category(&categories, 1);
        assert_eq!(filter.category_label(), "Builder floor");
        filter.cycle_category(&categories, 1);
        assert_eq!(filter.category_label(), "Kothi/Villa");
        filter.cycle_category(&categories, 1);
        assert_eq!(filter.category_label(), ALL_CATEGORIES);
        filter.cycle_category(&categories, -1);
        assert_eq!(filter.category_label(), "Kothi/Villa");
    }

    #[test]
    fn options_start_with_all() {
        let options = category_options(&["Kothi/Villa".to_string()]);
        assert_eq!(options, vec!["All", "Kothi/Villa"]);
    }
}
