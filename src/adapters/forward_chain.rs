//! Forward-chaining adapter: Hand-rolled ALL-of implementation of RuleEngine.
//!
//! Evaluates every registered rule against a flat fact set in a single
//! forward pass. Rules do not assert new facts, so one pass is complete.

use crate::ports::{Condition, ConditionOperator, FactValue, Facts, RuleDefinition, RuleEngine, RuleEvent};

/// Error type for rule evaluation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RuleEngineError {
    #[error("ordering comparison on non-numeric value for fact '{fact}'")]
    TypeMismatch { fact: String },
}

/// ALL-of forward-chaining rule evaluator.
///
/// A condition whose fact is absent simply fails; only a type-mismatched
/// ordering comparison is an error.
#[derive(Debug, Default)]
pub struct ForwardChainEngine {
    rules: Vec<RuleDefinition>,
}

impl ForwardChainEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn evaluate(condition: &Condition, facts: &Facts) -> Result<bool, RuleEngineError> {
        let Some(fact) = facts.get(&condition.fact) else {
            return Ok(false);
        };

        match condition.operator {
            ConditionOperator::Equal => Ok(Self::values_equal(fact, &condition.value)),
            ConditionOperator::NotEqual => Ok(!Self::values_equal(fact, &condition.value)),
            op => {
                let lhs = fact.as_number();
                let rhs = condition.value.as_number();
                let (Some(lhs), Some(rhs)) = (lhs, rhs) else {
                    return Err(RuleEngineError::TypeMismatch {
                        fact: condition.fact.clone(),
                    });
                };
                Ok(match op {
                    ConditionOperator::GreaterThan => lhs > rhs,
                    ConditionOperator::GreaterThanInclusive => lhs >= rhs,
                    ConditionOperator::LessThan => lhs < rhs,
                    ConditionOperator::LessThanInclusive => lhs <= rhs,
                    ConditionOperator::Equal | ConditionOperator::NotEqual => unreachable!(),
                })
            }
        }
    }

    fn values_equal(fact: &FactValue, expected: &FactValue) -> bool {
        match (fact, expected) {
            (FactValue::Number(a), FactValue::Number(b)) => a == b,
            (FactValue::Text(a), FactValue::Text(b)) => a == b,
            // Mixed types never compare equal.
            _ => false,
        }
    }
}

impl RuleEngine for ForwardChainEngine {
    type Error = RuleEngineError;

    fn add_rule(&mut self, rule: RuleDefinition) -> Result<(), Self::Error> {
        self.rules.push(rule);
        Ok(())
    }

    fn run(&self, facts: &Facts) -> Result<Vec<RuleEvent>, Self::Error> {
        let mut events = Vec::new();
        for rule in &self.rules {
            let mut fired = true;
            for condition in &rule.conditions.all {
                if !Self::evaluate(condition, facts)? {
                    fired = false;
                    break;
                }
            }
            if fired {
                events.push(rule.event.clone());
            }
        }
        Ok(events)
    }
}
