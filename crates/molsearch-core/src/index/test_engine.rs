//! Engine double that misbehaves on demand.

use crate::engine::{EngineIndex, EnginePattern, MatchingEngine};
use crate::error::{MolSearchError, Result};

/// Registers anything, and reports a fixed match list for every pattern.
#[derive(Debug, Default)]
pub(crate) struct ScriptedEngine {
    pub fail_create: bool,
    pub reported: Vec<usize>,
}

impl ScriptedEngine {
    pub fn failing_create() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    pub fn reporting(reported: Vec<usize>) -> Self {
        Self {
            reported,
            ..Self::default()
        }
    }
}

impl MatchingEngine for ScriptedEngine {
    type Pattern = ScriptedPattern;
    type Index = ScriptedIndex;

    fn create_index(&self) -> Result<ScriptedIndex> {
        if self.fail_create {
            return Err(MolSearchError::Engine {
                message: "out of engine memory".into(),
            });
        }
        Ok(ScriptedIndex {
            registered: 0,
            reported: self.reported.clone(),
        })
    }

    fn compile_pattern(&self, _pattern: &str) -> Result<ScriptedPattern> {
        Ok(ScriptedPattern)
    }
}

#[derive(Debug)]
pub(crate) struct ScriptedIndex {
    registered: usize,
    reported: Vec<usize>,
}

impl EngineIndex for ScriptedIndex {
    type Pattern = ScriptedPattern;

    fn add(&mut self, _structure: &str) -> Result<usize> {
        self.registered += 1;
        Ok(self.registered - 1)
    }

    fn matches(&self, _pattern: &ScriptedPattern) -> Result<Vec<usize>> {
        Ok(self.reported.clone())
    }

    fn len(&self) -> usize {
        self.registered
    }

    fn release(&mut self) {
        self.registered = 0;
    }
}

#[derive(Debug)]
pub(crate) struct ScriptedPattern;

impl EnginePattern for ScriptedPattern {
    fn release(&mut self) {}
}
