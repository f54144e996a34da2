//! Shared mock executor for statement-sequence tests.

use std::cell::RefCell;
use std::rc::Rc;

use may_postgres::types::ToSql;
use may_postgres::Row;

use crate::executor::{SiltError, SiltExecutor};

pub(crate) type StatementLog = Rc<RefCell<Vec<String>>>;

/// Records every statement it is asked to run and returns no rows.
///
/// Optionally fails statements containing a given pattern, for exercising
/// the suppress-vs-propagate paths.
pub(crate) struct RecordingExecutor {
    log: StatementLog,
    fail_matching: Option<&'static str>,
}

impl RecordingExecutor {
    pub(crate) fn new() -> (Self, StatementLog) {
        let log: StatementLog = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                log: Rc::clone(&log),
                fail_matching: None,
            },
            log,
        )
    }

    pub(crate) fn failing_on(pattern: &'static str) -> (Self, StatementLog) {
        let (mut executor, log) = Self::new();
        executor.fail_matching = Some(pattern);
        (executor, log)
    }

    fn check_failure(&self, query: &str) -> Result<(), SiltError> {
        if let Some(pattern) = self.fail_matching {
            if query.contains(pattern) {
                return Err(SiltError::QueryError(format!(
                    "forced failure on statement matching {pattern:?}"
                )));
            }
        }
        Ok(())
    }
}

impl SiltExecutor for RecordingExecutor {
    fn execute(&self, query: &str, _params: &[&dyn ToSql]) -> Result<u64, SiltError> {
        self.check_failure(query)?;
        self.log.borrow_mut().push(query.to_string());
        Ok(0)
    }

    fn query_one(&self, query: &str, _params: &[&dyn ToSql]) -> Result<Row, SiltError> {
        self.check_failure(query)?;
        Err(SiltError::QueryError("no rows".to_string()))
    }

    fn query_all(&self, query: &str, _params: &[&dyn ToSql]) -> Result<Vec<Row>, SiltError> {
        self.check_failure(query)?;
        self.log.borrow_mut().push(query.to_string());
        Ok(Vec::new())
    }
}
