use super::{FieldConditions, Severity, SoilMoisture, WeatherForecast};

/// What a fired clause contributes to the assessment.
pub(crate) struct ClauseEffect {
    pub(crate) escalate_to: Option<Severity>,
    pub(crate) threat: String,
    pub(crate) mitigations: &'static [&'static str],
}

/// Condition → effect rule, evaluated in table order.
pub(crate) struct RiskClause {
    pub(crate) name: &'static str,
    evaluate: fn(&FieldConditions) -> Option<ClauseEffect>,
}

pub(crate) const HEAT_STRESS_ABOVE: f64 = 35.0;
pub(crate) const COLD_STRESS_BELOW: f64 = 10.0;

pub(crate) static CLAUSES: [RiskClause; 8] = [
    RiskClause {
        name: "severe_weather",
        evaluate: severe_weather,
    },
    RiskClause {
        name: "heat_stress",
        evaluate: heat_stress,
    },
    RiskClause {
        name: "cold_stress",
        evaluate: cold_stress,
    },
    RiskClause {
        name: "dry_soil",
        evaluate: dry_soil,
    },
    RiskClause {
        name: "waterlogged_soil",
        evaluate: waterlogged_soil,
    },
    RiskClause {
        name: "pest_infestation",
        evaluate: pest_infestation,
    },
    RiskClause {
        name: "disease_signs",
        evaluate: disease_signs,
    },
    RiskClause {
        name: "weed_competition",
        evaluate: weed_competition,
    },
];

fn severe_weather(conditions: &FieldConditions) -> Option<ClauseEffect> {
    match conditions.weather_forecast {
        WeatherForecast::HeavyRain => Some(ClauseEffect {
            escalate_to: Some(Severity::High),
            threat: "Heavy rainfall may cause waterlogging and flooding".to_string(),
            mitigations: &[
                "Ensure proper drainage in fields",
                "Harvest mature crops if possible",
            ],
        }),
        WeatherForecast::Drought => Some(ClauseEffect {
            escalate_to: Some(Severity::High),
            threat: "Drought conditions may affect crop growth".to_string(),
            mitigations: &[
                "Implement water conservation techniques",
                "Consider drought-resistant crop varieties",
            ],
        }),
        _ => None,
    }
}

fn heat_stress(conditions: &FieldConditions) -> Option<ClauseEffect> {
    (conditions.temperature > HEAT_STRESS_ABOVE).then(|| ClauseEffect {
        escalate_to: Some(Severity::Moderate),
        threat: format!(
            "High temperature ({}°C) may cause heat stress",
            reading(conditions.temperature)
        ),
        mitigations: &[
            "Ensure adequate irrigation",
            "Apply mulch to conserve soil moisture",
        ],
    })
}

fn cold_stress(conditions: &FieldConditions) -> Option<ClauseEffect> {
    (conditions.temperature < COLD_STRESS_BELOW).then(|| ClauseEffect {
        escalate_to: Some(Severity::Moderate),
        threat: format!(
            "Low temperature ({}°C) may cause cold stress",
            reading(conditions.temperature)
        ),
        mitigations: &["Cover sensitive crops with frost blankets"],
    })
}

/// Whole degrees keep one decimal (`38.0`); anything finer prints as measured.
fn reading(temperature: f64) -> String {
    if temperature.fract() == 0.0 {
        format!("{temperature:.1}")
    } else {
        temperature.to_string()
    }
}

fn dry_soil(conditions: &FieldConditions) -> Option<ClauseEffect> {
    (conditions.soil_moisture == SoilMoisture::Dry).then(|| ClauseEffect {
        escalate_to: None,
        threat: "Dry soil conditions detected".to_string(),
        mitigations: &["Irrigate fields as needed"],
    })
}

fn waterlogged_soil(conditions: &FieldConditions) -> Option<ClauseEffect> {
    (conditions.soil_moisture == SoilMoisture::Waterlogged).then(|| ClauseEffect {
        escalate_to: Some(Severity::Moderate),
        threat: "Waterlogged soil may damage roots".to_string(),
        mitigations: &["Improve field drainage"],
    })
}

fn pest_infestation(conditions: &FieldConditions) -> Option<ClauseEffect> {
    conditions.pest_infestation.then(|| ClauseEffect {
        escalate_to: Some(Severity::Moderate),
        threat: "Pest infestation detected".to_string(),
        mitigations: &[
            "Inspect crops for pest damage",
            "Consider organic or chemical pest control methods",
        ],
    })
}

fn disease_signs(conditions: &FieldConditions) -> Option<ClauseEffect> {
    conditions.disease_signs.then(|| ClauseEffect {
        escalate_to: Some(Severity::Moderate),
        threat: "Signs of plant disease detected".to_string(),
        mitigations: &[
            "Identify the specific disease",
            "Apply appropriate fungicides if necessary",
        ],
    })
}

fn weed_competition(conditions: &FieldConditions) -> Option<ClauseEffect> {
    conditions.weed_problem.then(|| ClauseEffect {
        escalate_to: None,
        threat: "Weed competition detected".to_string(),
        mitigations: &["Remove weeds manually or with appropriate herbicides"],
    })
}

/// Accumulator threaded through the clause fold.
#[derive(Debug, Default)]
pub(crate) struct RiskLedger {
    pub(crate) severity: Severity,
    pub(crate) threats: Vec<String>,
    pub(crate) mitigations: Vec<String>,
    pub(crate) triggered: Vec<&'static str>,
}

impl RiskLedger {
    /// Severity can only rise: the new level is the max of current and requested.
    fn apply(mut self, (name, effect): (&'static str, ClauseEffect)) -> Self {
        if let Some(level) = effect.escalate_to {
            self.severity = self.severity.max(level);
        }
        self.threats.push(effect.threat);
        self.mitigations
            .extend(effect.mitigations.iter().map(|line| line.to_string()));
        self.triggered.push(name);
        self
    }
}

fn fired(conditions: &FieldConditions) -> impl Iterator<Item = (&'static str, ClauseEffect)> + '_ {
    CLAUSES
        .iter()
        .filter_map(move |clause| (clause.evaluate)(conditions).map(|effect| (clause.name, effect)))
}

pub(crate) fn run_clauses(conditions: &FieldConditions) -> RiskLedger {
    fired(conditions).fold(RiskLedger::default(), RiskLedger::apply)
}

/// Severity after each fired clause, in evaluation order.
#[cfg(test)]
pub(crate) fn severity_trail(conditions: &FieldConditions) -> Vec<Severity> {
    fired(conditions)
        .scan(RiskLedger::default(), |ledger, step| {
            let next = std::mem::take(ledger).apply(step);
            let level = next.severity;
            *ledger = next;
            Some(level)
        })
        .collect()
}
