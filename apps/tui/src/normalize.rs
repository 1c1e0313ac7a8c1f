//! Country name normalization and the recognized-country allow-list.
//!
//! Every dataset spells some countries differently (World Bank uses
//! "Korea, Rep.", Natural Earth uses "Republic of Korea", IEA uses "Korea").
//! All of them are folded onto one canonical spelling before any table is
//! written or read.

use crate::domain::CountryName;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AliasError {
    #[error("alias target {target:?} is itself an alias for {next:?}")]
    Chained { target: String, next: String },
}

const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("United States of America", "United States"),
    ("USA", "United States"),
    ("Russian Federation", "Russia"),
    ("Korea, Rep.", "South Korea"),
    ("Republic of Korea", "South Korea"),
    ("Korea", "South Korea"),
    ("Korea, Dem. People's Rep.", "North Korea"),
    ("Dem. Rep. Korea", "North Korea"),
    ("Iran, Islamic Rep.", "Iran"),
    ("Egypt, Arab Rep.", "Egypt"),
    ("Venezuela, RB", "Venezuela"),
    ("Yemen, Rep.", "Yemen"),
    ("Syrian Arab Republic", "Syria"),
    ("Lao PDR", "Laos"),
    ("Kyrgyz Republic", "Kyrgyzstan"),
    ("Slovak Republic", "Slovakia"),
    ("Czechia", "Czech Republic"),
    ("Turkiye", "Turkey"),
    ("Viet Nam", "Vietnam"),
    ("Brunei Darussalam", "Brunei"),
    ("Gambia, The", "Gambia"),
    ("Bahamas, The", "Bahamas"),
    ("Congo, Dem. Rep.", "Democratic Republic of the Congo"),
    ("Dem. Rep. Congo", "Democratic Republic of the Congo"),
    ("Congo, Rep.", "Republic of the Congo"),
    ("Congo", "Republic of the Congo"),
    ("Cote d'Ivoire", "Ivory Coast"),
    ("Côte d'Ivoire", "Ivory Coast"),
    ("United Kingdom of Great Britain and Northern Ireland", "United Kingdom"),
    ("Bosnia and Herz.", "Bosnia and Herzegovina"),
    ("Central African Rep.", "Central African Republic"),
    ("Dominican Rep.", "Dominican Republic"),
    ("Eq. Guinea", "Equatorial Guinea"),
    ("S. Sudan", "South Sudan"),
    ("Solomon Is.", "Solomon Islands"),
    ("eSwatini", "Eswatini"),
    ("Swaziland", "Eswatini"),
    ("Macedonia", "North Macedonia"),
    ("Micronesia, Fed. Sts.", "Micronesia"),
    ("St. Lucia", "Saint Lucia"),
    ("St. Vincent and the Grenadines", "Saint Vincent and the Grenadines"),
    ("St. Kitts and Nevis", "Saint Kitts and Nevis"),
    ("Cabo Verde", "Cape Verde"),
    ("Timor-Leste", "East Timor"),
    ("Myanmar (Burma)", "Myanmar"),
    ("W. Sahara", "Western Sahara"),
];

/// Maps raw spellings to canonical names. The alias table is fixed at
/// construction.
#[derive(Debug, Clone)]
pub struct CountryNormalizer {
    aliases: HashMap<String, String>,
}

impl CountryNormalizer {
    /// Builds a normalizer from `(raw, canonical)` pairs. A canonical name may
    /// not itself be a raw key pointing somewhere else, so normalizing twice
    /// gives the same result as normalizing once.
    pub fn new<I, K, V>(aliases: I) -> Result<Self, AliasError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let aliases: HashMap<String, String> = aliases
            .into_iter()
            .map(|(raw, canonical)| (raw.into(), canonical.into()))
            .collect();

        for target in aliases.values() {
            if let Some(next) = aliases.get(target) {
                if next != target {
                    return Err(AliasError::Chained {
                        target: target.clone(),
                        next: next.clone(),
                    });
                }
            }
        }

        Ok(Self { aliases })
    }

    /// Alias lookup on the trimmed name; unknown names come back trimmed
    /// but otherwise unchanged, so CSV padding never splits a country.
    pub fn normalize(&self, raw: &str) -> CountryName {
        let trimmed = raw.trim();
        let canonical = self.aliases.get(trimmed).map_or(trimmed, String::as_str);
        CountryName::new(canonical)
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}

impl Default for CountryNormalizer {
    fn default() -> Self {
        Self {
            aliases: DEFAULT_ALIASES
                .iter()
                .map(|(raw, canonical)| ((*raw).to_string(), (*canonical).to_string()))
                .collect(),
        }
    }
}

const DEFAULT_RECOGNIZED: &[&str] = &[
    "Afghanistan", "Albania", "Algeria", "Andorra", "Angola", "Antigua and Barbuda",
    "Argentina", "Armenia", "Australia", "Austria", "Azerbaijan", "Bahamas", "Bahrain",
    "Bangladesh", "Barbados", "Belarus", "Belgium", "Belize", "Benin", "Bhutan", "Bolivia",
    "Bosnia and Herzegovina", "Botswana", "Brazil", "Brunei", "Bulgaria", "Burkina Faso",
    "Burundi", "Cambodia", "Cameroon", "Canada", "Cape Verde", "Central African Republic",
    "Chad", "Chile", "China", "Colombia", "Comoros", "Costa Rica", "Croatia", "Cuba",
    "Cyprus", "Czech Republic", "Democratic Republic of the Congo", "Denmark", "Djibouti",
    "Dominica", "Dominican Republic", "East Timor", "Ecuador", "Egypt", "El Salvador",
    "Equatorial Guinea", "Eritrea", "Estonia", "Eswatini", "Ethiopia", "Fiji", "Finland",
    "France", "Gabon", "Gambia", "Georgia", "Germany", "Ghana", "Greece", "Grenada",
    "Guatemala", "Guinea", "Guinea-Bissau", "Guyana", "Haiti", "Honduras", "Hungary",
    "Iceland", "India", "Indonesia", "Iran", "Iraq", "Ireland", "Israel", "Italy",
    "Ivory Coast", "Jamaica", "Japan", "Jordan", "Kazakhstan", "Kenya", "Kiribati",
    "Kuwait", "Kyrgyzstan", "Laos", "Latvia", "Lebanon", "Lesotho", "Liberia", "Libya",
    "Liechtenstein", "Lithuania", "Luxembourg", "Madagascar", "Malawi", "Malaysia",
    "Maldives", "Mali", "Malta", "Marshall Islands", "Mauritania", "Mauritius", "Mexico",
    "Micronesia", "Moldova", "Monaco", "Mongolia", "Montenegro", "Morocco", "Mozambique",
    "Myanmar", "Namibia", "Nauru", "Nepal", "Netherlands", "New Zealand", "Nicaragua",
    "Niger", "Nigeria", "North Korea", "North Macedonia", "Norway", "Oman", "Pakistan",
    "Palau", "Panama", "Papua New Guinea", "Paraguay", "Peru", "Philippines", "Poland",
    "Portugal", "Qatar", "Republic of the Congo", "Romania", "Russia", "Rwanda",
    "Saint Kitts and Nevis", "Saint Lucia", "Saint Vincent and the Grenadines", "Samoa",
    "San Marino", "Sao Tome and Principe", "Saudi Arabia", "Senegal", "Serbia",
    "Seychelles", "Sierra Leone", "Singapore", "Slovakia", "Slovenia", "Solomon Islands",
    "Somalia", "South Africa", "South Korea", "South Sudan", "Spain", "Sri Lanka", "Sudan",
    "Suriname", "Sweden", "Switzerland", "Syria", "Tajikistan", "Tanzania", "Thailand",
    "Togo", "Tonga", "Trinidad and Tobago", "Tunisia", "Turkey", "Turkmenistan", "Tuvalu",
    "Uganda", "Ukraine", "United Arab Emirates", "United Kingdom", "United States",
    "Uruguay", "Uzbekistan", "Vanuatu", "Venezuela", "Vietnam", "Yemen", "Zambia",
    "Zimbabwe",
];

/// Canonical names allowed into rankings. Keeps regional aggregates such as
/// "World" or "High income" out of the top emitters.
#[derive(Debug, Clone)]
pub struct RecognizedCountries {
    names: HashSet<CountryName>,
}

impl RecognizedCountries {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>, normalizer: &CountryNormalizer) -> Self {
        Self {
            names: names.into_iter().map(|name| normalizer.normalize(name)).collect(),
        }
    }

    pub fn contains(&self, country: &CountryName) -> bool {
        self.names.contains(country)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for RecognizedCountries {
    fn default() -> Self {
        Self::new(DEFAULT_RECOGNIZED.iter().copied(), &CountryNormalizer::default())
    }
}
