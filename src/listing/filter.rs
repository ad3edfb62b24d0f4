//! Filtering

use super::Listable;

/// Case-insensitive substring match of `search` against the record's name.
///
/// An empty search matches everything.
pub fn matches_search<T: Listable>(item: &T, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }

    item.name().to_lowercase().contains(&search.to_lowercase())
}

/// Keep the records matching both the search text and the facet, in input order.
pub fn filter<'a, T: Listable>(
    items: &'a [T],
    search: &str,
    facet: Option<&T::Facet>,
) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| matches_search(*item, search))
        .filter(|item| facet.is_none_or(|wanted| item.facet().as_ref() == Some(wanted)))
        .collect()
}

/// Distinct facet values present in `items`, in first-seen order.
pub fn facet_options<T: Listable>(items: &[T]) -> Vec<T::Facet> {
    items.iter().filter_map(Listable::facet).fold(
        Vec::new(),
        |mut options, facet| {
            if !options.contains(&facet) {
                options.push(facet);
            }

            options
        },
    )
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use jiff::Timestamp;

    use super::*;
    use crate::listing::test_support::row;

    #[derive(Debug)]
    struct Tagged(&'static str, &'static str);

    impl Listable for Tagged {
        type Facet = &'static str;

        fn name(&self) -> Cow<'_, str> {
            Cow::Borrowed(self.0)
        }

        fn created_at(&self) -> Timestamp {
            Timestamp::UNIX_EPOCH
        }

        fn facet(&self) -> Option<&'static str> {
            Some(self.1)
        }
    }

    #[test]
    fn empty_search_returns_collection_unchanged() {
        let items = [row("Mango", 1, 5), row("kiwi", 2, 3), row("Lime", 3, 1)];

        let matched = filter(&items, "", None);

        assert_eq!(matched, items.iter().collect::<Vec<_>>());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let items = [row("Red APPLE", 1, 5), row("Pear", 2, 3), row("apple pie", 3, 1)];

        let names: Vec<&str> = filter(&items, "ApPlE", None)
            .into_iter()
            .map(|r| r.name)
            .collect();

        assert_eq!(names, vec!["Red APPLE", "apple pie"]);
    }

    #[test]
    fn every_match_contains_the_query() {
        let items = [row("Orange", 1, 5), row("Blood orange", 2, 3), row("Plum", 3, 1)];

        for query in ["o", "OR", "range", "plum", "zzz"] {
            for item in filter(&items, query, None) {
                assert!(
                    item.name.to_lowercase().contains(&query.to_lowercase()),
                    "{} should contain {query}",
                    item.name
                );
            }
        }
    }

    #[test]
    fn facet_filter_is_equality() {
        let items = [
            Tagged("Apple", "fruit"),
            Tagged("Carrot", "vegetable"),
            Tagged("Pear", "fruit"),
        ];

        let names: Vec<&str> = filter(&items, "", Some(&"fruit"))
            .into_iter()
            .map(|t| t.0)
            .collect();

        assert_eq!(names, vec!["Apple", "Pear"]);
    }

    #[test]
    fn facet_options_are_distinct_in_first_seen_order() {
        let items = [
            Tagged("Apple", "fruit"),
            Tagged("Carrot", "vegetable"),
            Tagged("Pear", "fruit"),
            Tagged("Mint", "herb"),
        ];

        assert_eq!(facet_options(&items), vec!["fruit", "vegetable", "herb"]);
    }
}
