use crate::domain::CountryName;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Which selection the picker writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerSlot {
    First,
    Second,
}

impl PickerSlot {
    pub const fn label(self) -> &'static str {
        match self {
            Self::First => "Select a country",
            Self::Second => "Select a country to compare",
        }
    }
}

/// Searchable country list shown as an overlay.
#[derive(Debug, Clone)]
pub struct CountryPicker {
    pub slot: PickerSlot,
    pub query: String,
    pub selected: usize,
}

impl CountryPicker {
    pub const fn new(slot: PickerSlot) -> Self {
        Self {
            slot,
            query: String::new(),
            selected: 0,
        }
    }

    /// Candidates matching the query, best match first. An empty query keeps
    /// the alphabetical order.
    pub fn matches<'a>(&self, countries: &'a [CountryName]) -> Vec<&'a CountryName> {
        let mut sorted: Vec<&CountryName> = countries.iter().collect();
        sorted.sort();

        let query = self.query.trim();
        if query.is_empty() {
            return sorted;
        }

        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, &CountryName)> = sorted
            .into_iter()
            .filter_map(|country| {
                matcher
                    .fuzzy_match(country.as_str(), query)
                    .map(|score| (score, country))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, country)| country).collect()
    }

    pub fn push(&mut self, ch: char) {
        self.query.push(ch);
        self.selected = 0;
    }

    pub fn pop(&mut self) {
        self.query.pop();
        self.selected = 0;
    }

    pub fn current<'a>(&self, countries: &'a [CountryName]) -> Option<&'a CountryName> {
        self.matches(countries).get(self.selected).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::CountryNormalizer;

    fn countries() -> Vec<CountryName> {
        let normalizer = CountryNormalizer::default();
        ["Germany", "China", "Chad", "United States"]
            .iter()
            .map(|name| normalizer.normalize(name))
            .collect()
    }

    #[test]
    fn empty_query_lists_alphabetically() {
        let picker = CountryPicker::new(PickerSlot::First);
        let all = countries();
        let names: Vec<&str> = picker.matches(&all).iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["Chad", "China", "Germany", "United States"]);
    }

    #[test]
    fn query_filters_fuzzily() {
        let mut picker = CountryPicker::new(PickerSlot::Second);
        for ch in "usa".chars() {
            picker.push(ch);
        }
        let all = countries();
        assert_eq!(picker.current(&all).map(CountryName::as_str), Some("United States"));

        picker.pop();
        picker.pop();
        picker.pop();
        picker.push('z');
        assert!(picker.current(&all).is_none());
    }
}
