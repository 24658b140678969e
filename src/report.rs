//! Plain-data results for callers that consume JSON.

use serde::{Deserialize, Serialize};

use crate::equity::EquityEstimate;
use crate::error::EngineResult;
use crate::hand_evaluator::HandResult;
use crate::math_engine::PotOddsReport;
use crate::outs::OutsReport;
use crate::ranges::RangeMatch;

/// Serialize any report to a JSON string.
pub trait ToJson: Serialize {
    fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn to_json_pretty(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport {
    pub category: String,
    /// 1 (High Card) through 10 (Royal Flush).
    pub weight: u8,
    pub best_five: Vec<String>,
    pub kickers: Vec<u8>,
    pub description: String,
}

impl From<&HandResult> for EvaluationReport {
    fn from(result: &HandResult) -> Self {
        EvaluationReport {
            category: result.category.name().to_string(),
            weight: result.weight(),
            best_five: result.cards.iter().map(|c| c.to_string()).collect(),
            kickers: result.kickers.clone(),
            description: result.describe(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityReport {
    pub win_rate: f64,
    pub tie_rate: f64,
    pub trials: usize,
}

impl From<&EquityEstimate> for EquityReport {
    fn from(e: &EquityEstimate) -> Self {
        EquityReport {
            win_rate: e.win_rate,
            tie_rate: e.tie_rate,
            trials: e.trials,
        }
    }
}

impl ToJson for EvaluationReport {}
impl ToJson for EquityReport {}
impl ToJson for RangeMatch {}
impl ToJson for PotOddsReport {}
impl ToJson for OutsReport {}
