// =============================================================================
// GangaWatch Dashboard - Scenario Catalog
// =============================================================================
// Table of Contents:
// 1. Cities
// 2. Scenarios
// 3. Selection
// 4. Tests
// =============================================================================

use serde::Serialize;

// -----------------------------------------------------------------------------
// 1. Cities
// -----------------------------------------------------------------------------

/// Monitoring stations with forecast artifacts, in sidebar order.
pub const CITIES: &[&str] = &[
    "Kanpur",
    "Kannauj",
    "Varanasi",
    "Devprayag",
    "Rudraprayag",
    "Haridwar",
    "Gulabi ghat",
    "Ghazipur",
    "Bhagalpur",
    "Howrah",
    "Prayagraj",
    "Dakshineshwar",
];

// -----------------------------------------------------------------------------
// 2. Scenarios
// -----------------------------------------------------------------------------

/// A hypothetical disturbance and the parameters it moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(serialize_with = "serialize_effects")]
    pub affected_params: &'static [(&'static str, &'static str)],
}

impl Scenario {
    /// Affected parameter names in display order.
    pub fn parameters(&self) -> impl Iterator<Item = &'static str> {
        self.affected_params.iter().map(|(param, _)| *param)
    }

    /// Expected effect of this scenario on `parameter`, if it is affected.
    pub fn effect(&self, parameter: &str) -> Option<&'static str> {
        self.affected_params
            .iter()
            .find(|(param, _)| *param == parameter)
            .map(|(_, effect)| *effect)
    }

    fn find_parameter(&self, parameter: &str) -> Option<&'static str> {
        self.parameters().find(|p| *p == parameter)
    }
}

#[derive(Serialize)]
struct EffectEntry {
    parameter: &'static str,
    effect: &'static str,
}

fn serialize_effects<S>(
    effects: &&'static [(&'static str, &'static str)],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(
        effects
            .iter()
            .map(|&(parameter, effect)| EffectEntry { parameter, effect }),
    )
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "Algal Bloom",
        description: "Algal bloom caused by nutrient overload alters water quality.",
        affected_params: &[
            ("Dissolved Oxygen", "-50%"),
            ("Biochemical Oxygen Demand", "+40%"),
            ("Nitrate", "-25%"),
            ("pH", "±15% fluctuations"),
        ],
    },
    Scenario {
        name: "Introduction of New Wastewater Treatment Plants",
        description: "Installation of new wastewater treatment plants reduces pollution.",
        affected_params: &[
            ("Biochemical Oxygen Demand", "-30%"),
            ("Total Coliform", "-50%"),
            ("Fecal Coliform", "-50%"),
            ("Dissolved Oxygen", "+30%"),
        ],
    },
    Scenario {
        name: "Seasonal Temperature Variations",
        description: "Seasonal temperature changes impact water parameters.",
        affected_params: &[
            ("Temperature", "±20% seasonal variation"),
            ("Dissolved Oxygen", "-30% (inverse relationship in summer)"),
            ("Biochemical Oxygen Demand", "+10%"),
        ],
    },
    Scenario {
        name: "Industrial Discharge Incident",
        description: "Industrial effluent discharge affects river water quality.",
        affected_params: &[
            ("Biochemical Oxygen Demand", "+50%"),
            ("Conductivity", "+60%"),
            ("Dissolved Oxygen", "-40%"),
            ("Nitrate", "+30%"),
        ],
    },
    Scenario {
        name: "Festival or Pilgrimage Event",
        description: "Large religious events impact water quality due to high crowd and waste.",
        affected_params: &[
            ("Biochemical Oxygen Demand", "+40%"),
            ("Total Coliform", "+60%"),
            ("Fecal Coliform", "+50%"),
            ("Fecal Streptococci", "+50%"),
            ("Turbidity", "+40%"),
            ("Dissolved Oxygen", "-25%"),
        ],
    },
    Scenario {
        name: "Monsoon Flooding",
        description: "Heavy monsoon rainfall raises flow and washes sediment and waste into the river.",
        affected_params: &[
            ("Turbidity", "+80%"),
            ("Total Coliform", "+45%"),
            ("Conductivity", "-20% (dilution)"),
            ("Dissolved Oxygen", "+10%"),
        ],
    },
    Scenario {
        name: "Drought and Low Flow",
        description: "Reduced discharge concentrates pollutants and warms the water column.",
        affected_params: &[
            ("Conductivity", "+35%"),
            ("Biochemical Oxygen Demand", "+25%"),
            ("Temperature", "+10%"),
            ("Dissolved Oxygen", "-20%"),
        ],
    },
    Scenario {
        name: "Agricultural Runoff",
        description: "Fertiliser and pesticide runoff from farmland enters the river after irrigation.",
        affected_params: &[
            ("Nitrate", "+55%"),
            ("Biochemical Oxygen Demand", "+15%"),
            ("pH", "±10% fluctuations"),
            ("Turbidity", "+20%"),
        ],
    },
    Scenario {
        name: "Sewage Overflow",
        description: "Untreated municipal sewage bypasses treatment and discharges directly.",
        affected_params: &[
            ("Fecal Coliform", "+70%"),
            ("Total Coliform", "+65%"),
            ("Fecal Streptococci", "+55%"),
            ("Biochemical Oxygen Demand", "+45%"),
            ("Dissolved Oxygen", "-35%"),
        ],
    },
    Scenario {
        name: "Upstream Dam Release",
        description: "A controlled reservoir release changes flow, temperature and sediment load downstream.",
        affected_params: &[
            ("Temperature", "-15%"),
            ("Turbidity", "+30%"),
            ("Dissolved Oxygen", "+15%"),
            ("Conductivity", "-10%"),
        ],
    },
];

pub fn cities() -> &'static [&'static str] {
    CITIES
}

pub fn scenarios() -> &'static [Scenario] {
    SCENARIOS
}

/// Exact, case-sensitive city lookup.
pub fn find_city(name: &str) -> Option<&'static str> {
    CITIES.iter().copied().find(|city| *city == name)
}

/// Exact, case-sensitive scenario lookup.
pub fn find_scenario(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|scenario| scenario.name == name)
}

// -----------------------------------------------------------------------------
// 3. Selection
// -----------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),
}

/// A validated (city, scenario, parameter) triple.
///
/// Every field borrows from the static catalog, so paths built from a
/// `Selection` never contain caller-supplied text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub city: &'static str,
    pub scenario: &'static Scenario,
    pub parameter: &'static str,
}

impl Selection {
    /// Resolve raw form values against the catalog.
    ///
    /// Missing values default to the first catalog entry. A parameter that the
    /// chosen scenario does not affect falls back to the scenario's first
    /// parameter, which is what happens when the scenario select changes.
    pub fn resolve(
        city: Option<&str>,
        scenario: Option<&str>,
        parameter: Option<&str>,
    ) -> Result<Self, SelectionError> {
        let city = match city {
            Some(name) => {
                find_city(name).ok_or_else(|| SelectionError::UnknownCity(name.to_string()))?
            }
            None => CITIES[0],
        };

        let scenario = match scenario {
            Some(name) => find_scenario(name)
                .ok_or_else(|| SelectionError::UnknownScenario(name.to_string()))?,
            None => &SCENARIOS[0],
        };

        let parameter = parameter
            .and_then(|p| scenario.find_parameter(p))
            .unwrap_or(scenario.affected_params[0].0);

        Ok(Self {
            city,
            scenario,
            parameter,
        })
    }

    /// Effect text for the selected parameter.
    pub fn effect(&self) -> &'static str {
        self.scenario.effect(self.parameter).unwrap_or_default()
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            city: CITIES[0],
            scenario: &SCENARIOS[0],
            parameter: SCENARIOS[0].affected_params[0].0,
        }
    }
}

// -----------------------------------------------------------------------------
// 4. Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(cities().len(), 12);
        assert_eq!(scenarios().len(), 10);
    }

    #[test]
    fn test_names_are_unique() {
        let cities: HashSet<_> = CITIES.iter().collect();
        assert_eq!(cities.len(), CITIES.len());

        let scenarios: HashSet<_> = SCENARIOS.iter().map(|s| s.name).collect();
        assert_eq!(scenarios.len(), SCENARIOS.len());

        for scenario in SCENARIOS {
            let params: HashSet<_> = scenario.parameters().collect();
            assert_eq!(
                params.len(),
                scenario.affected_params.len(),
                "duplicate parameter in {}",
                scenario.name
            );
        }
    }

    #[test]
    fn test_every_scenario_has_parameters() {
        for scenario in SCENARIOS {
            assert!(!scenario.affected_params.is_empty(), "{}", scenario.name);
            assert!(!scenario.description.is_empty(), "{}", scenario.name);
        }
    }

    #[test]
    fn test_effect_lookup() {
        let bloom = find_scenario("Algal Bloom").unwrap();
        assert_eq!(bloom.effect("Dissolved Oxygen"), Some("-50%"));
        assert_eq!(bloom.effect("pH"), Some("±15% fluctuations"));
        assert_eq!(bloom.effect("Turbidity"), None);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(find_city("Kanpur"), Some("Kanpur"));
        assert_eq!(find_city("kanpur"), None);
        assert!(find_scenario("algal bloom").is_none());
    }

    #[test]
    fn test_resolve_defaults() {
        let selection = Selection::resolve(None, None, None).unwrap();
        assert_eq!(selection, Selection::default());
        assert_eq!(selection.city, "Kanpur");
        assert_eq!(selection.scenario.name, "Algal Bloom");
        assert_eq!(selection.parameter, "Dissolved Oxygen");
        assert_eq!(selection.effect(), "-50%");
    }

    #[test]
    fn test_resolve_explicit() {
        let selection = Selection::resolve(
            Some("Gulabi ghat"),
            Some("Festival or Pilgrimage Event"),
            Some("Turbidity"),
        )
        .unwrap();
        assert_eq!(selection.city, "Gulabi ghat");
        assert_eq!(selection.scenario.name, "Festival or Pilgrimage Event");
        assert_eq!(selection.parameter, "Turbidity");
        assert_eq!(selection.effect(), "+40%");
    }

    #[test]
    fn test_resolve_parameter_falls_back_to_first() {
        let selection = Selection::resolve(
            Some("Varanasi"),
            Some("Seasonal Temperature Variations"),
            Some("pH"),
        )
        .unwrap();
        assert_eq!(selection.parameter, "Temperature");
    }

    #[test]
    fn test_resolve_rejects_unknown_names() {
        assert_eq!(
            Selection::resolve(Some("Atlantis"), None, None),
            Err(SelectionError::UnknownCity("Atlantis".into()))
        );
        assert_eq!(
            Selection::resolve(None, Some("../etc"), None),
            Err(SelectionError::UnknownScenario("../etc".into()))
        );
    }

    #[test]
    fn test_scenario_serializes_effects_as_list() {
        let json = serde_json::to_value(find_scenario("Algal Bloom").unwrap()).unwrap();
        assert_eq!(json["name"], "Algal Bloom");
        assert_eq!(json["affected_params"][0]["parameter"], "Dissolved Oxygen");
        assert_eq!(json["affected_params"][0]["effect"], "-50%");
        assert_eq!(json["affected_params"].as_array().unwrap().len(), 4);
    }
}
