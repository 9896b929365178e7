use std::path::PathBuf;
use tracing::instrument;

use crate::console::{CompletionNotice, Console};
use crate::error::{ErrorKind, UserError, UserResult};
use crate::error_log::ErrorLog;
use crate::models::{NewUser, User};
use crate::persistence::{PersistenceStep, SimulatedPersistence};
use crate::repository::{InMemoryUserRepository, UserRepository};

/// Validates, deduplicates and stores users, logging every failure
pub struct UserManager<R: UserRepository, P: PersistenceStep> {
    repository: R,
    persistence: P,
    error_log: ErrorLog,
    console: Console,
    next_id: u32,
}

impl UserManager<InMemoryUserRepository, SimulatedPersistence> {
    /// In-memory registry with the simulated save step
    pub fn in_memory(
        error_log_path: impl Into<PathBuf>,
        persistence_failure_rate: f64,
        console: Console,
    ) -> Self {
        Self::new(
            InMemoryUserRepository::new(),
            SimulatedPersistence::new(persistence_failure_rate),
            ErrorLog::new(error_log_path),
            console,
        )
    }
}

impl<R: UserRepository, P: PersistenceStep> UserManager<R, P> {
    pub fn new(repository: R, persistence: P, error_log: ErrorLog, console: Console) -> Self {
        Self {
            repository,
            persistence,
            error_log,
            console,
            next_id: 1,
        }
    }

    /// Validate and store one candidate user.
    ///
    /// Steps, each of which can end the attempt:
    /// 1. field validation (all violations reported together)
    /// 2. email uniqueness (exact match)
    /// 3. id assignment and storage
    /// 4. the save step; on failure the stored record is removed again,
    ///    the consumed id is not reused
    ///
    /// Every failure is reported on the console and appended to the error
    /// log. Errors where [`UserError::is_handled`] is false must be dealt with
    /// by the caller. A completion notice is printed on every path.
    #[instrument(skip_all, fields(email = %candidate.email))]
    pub fn add_user(&mut self, candidate: NewUser) -> UserResult<User> {
        let _notice = CompletionNotice::new(self.console.clone());

        match self.try_add_user(candidate) {
            Ok(user) => {
                tracing::info!(user_id = user.id(), "User added");
                self.console
                    .line(format!("User {} added with ID {}.", user.name, user.id()));
                Ok(user)
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }

    fn try_add_user(&mut self, candidate: NewUser) -> UserResult<User> {
        let violations = candidate.violations();
        if !violations.is_empty() {
            return Err(UserError::Validation(violations));
        }

        if self.repository.email_exists(&candidate.email)? {
            return Err(UserError::DuplicateEmail(candidate.email));
        }

        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or_else(|| UserError::Internal("user id space exhausted".to_string()))?;

        let user = self.repository.create(candidate.into_user(id))?;

        if let Err(err) = self.persistence.save(&user) {
            if let Err(rollback) = self.repository.remove(user.id()) {
                // the save failure is logged on its own; the stuck record surfaces as unexpected
                self.report(&err);
                return Err(UserError::Internal(format!(
                    "failed to roll back user {} after save error ({}): {}",
                    user.id(),
                    err,
                    rollback
                )));
            }
            tracing::debug!(user_id = user.id(), "Rolled back unsaved user");
            return Err(err);
        }

        Ok(user)
    }

    fn report(&self, err: &UserError) {
        match err {
            UserError::Validation(violations) => {
                tracing::warn!(count = violations.len(), "Validation failed");
                self.console.line("Validation errors:");
                for violation in violations {
                    self.console.line(format!("  - {}", violation));
                }
            }
            UserError::DuplicateEmail(email) => {
                tracing::warn!(%email, "Duplicate email");
                self.console.line(format!("Error: {}", err));
            }
            UserError::Persistence(_) => {
                tracing::warn!(error = %err, "Save step failed");
                self.console.line(format!("Error: {}", err));
            }
            UserError::Internal(_) => {
                tracing::error!(error = %err, "Unexpected error while adding user");
                self.console.line(format!("Unexpected error: {}", err));
            }
        }

        self.record(err.kind(), &err.to_string());
    }

    /// Append to the error log; a failed write is reported and swallowed
    fn record(&self, kind: ErrorKind, message: &str) {
        if let Err(e) = self.error_log.append(kind, message) {
            tracing::warn!(
                path = %self.error_log.path().display(),
                error = %e,
                "Failed to write error log"
            );
            self.console
                .line(format!("Failed to write to error log: {}", e));
        }
    }

    /// Stored users in insertion order
    pub fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.list()
    }

    /// Look up a stored user by exact email
    pub fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        self.repository.get_by_email(email)
    }

    pub fn len(&self) -> UserResult<usize> {
        self.repository.count()
    }

    pub fn is_empty(&self) -> UserResult<bool> {
        Ok(self.len()? == 0)
    }

    pub fn console(&self) -> &Console {
        &self.console
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{CapturedLines, COMPLETION_NOTICE};
    use crate::persistence::MockPersistenceStep;
    use crate::repository::MockUserRepository;
    use tempfile::TempDir;

    fn ivan() -> NewUser {
        NewUser::new("Иван Иванов", "ivan@example.com", "Password123", 25)
    }

    fn saving() -> MockPersistenceStep {
        let mut persistence = MockPersistenceStep::new();
        persistence.expect_save().returning(|_| Ok(()));
        persistence
    }

    fn manager_with<R: UserRepository, P: PersistenceStep>(
        dir: &TempDir,
        repository: R,
        persistence: P,
    ) -> (UserManager<R, P>, CapturedLines) {
        let (console, captured) = Console::memory();
        let manager = UserManager::new(
            repository,
            persistence,
            ErrorLog::new(dir.path().join("errors.log")),
            console,
        );
        (manager, captured)
    }

    fn log_lines(dir: &TempDir) -> Vec<String> {
        std::fs::read_to_string(dir.path().join("errors.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_add_valid_user_assigns_first_id() {
        let dir = TempDir::new().unwrap();
        let (mut manager, captured) = manager_with(&dir, InMemoryUserRepository::new(), saving());

        let user = manager.add_user(ivan()).unwrap();

        assert_eq!(user.id(), 1);
        assert_eq!(manager.list_users().unwrap(), vec![user]);
        assert_eq!(captured.count_of(COMPLETION_NOTICE), 1);
        assert!(log_lines(&dir).is_empty());
    }

    #[test]
    fn test_validation_failure_consumes_no_id() {
        let dir = TempDir::new().unwrap();
        let (mut manager, captured) = manager_with(&dir, InMemoryUserRepository::new(), saving());

        let result = manager.add_user(NewUser::new("Петр Петров", "неправильный-email", "pass", 17));
        match result {
            Err(UserError::Validation(violations)) => assert_eq!(violations.len(), 4),
            other => panic!("expected validation error, got {other:?}"),
        }

        let user = manager.add_user(ivan()).unwrap();
        assert_eq!(user.id(), 1);

        let log = log_lines(&dir);
        assert_eq!(log.len(), 1);
        assert!(log[0].contains(" - ValidationError: Email address is not valid; "));
        assert!(captured.lines().contains(&"  - Age must be between 18 and 120".to_string()));
        assert_eq!(captured.count_of(COMPLETION_NOTICE), 2);
    }

    #[test]
    fn test_duplicate_email_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (mut manager, captured) = manager_with(&dir, InMemoryUserRepository::new(), saving());

        manager.add_user(ivan()).unwrap();
        let second = NewUser::new("Другой Иван", "ivan@example.com", "Password456", 40);
        let result = manager.add_user(second);

        assert!(matches!(result, Err(UserError::DuplicateEmail(ref e)) if e == "ivan@example.com"));
        assert_eq!(manager.len().unwrap(), 1);

        let log = log_lines(&dir);
        assert_eq!(log.len(), 1);
        assert!(log[0].contains(" - DuplicateEmailError: "));
        assert_eq!(captured.count_of(COMPLETION_NOTICE), 2);

        // no id was consumed by the duplicate
        let next = manager
            .add_user(NewUser::new("Анна", "anna@example.com", "Password789", 30))
            .unwrap();
        assert_eq!(next.id(), 2);
    }

    #[test]
    fn test_persistence_failure_rolls_back_but_consumes_id() {
        let dir = TempDir::new().unwrap();
        let mut persistence = MockPersistenceStep::new();
        let mut calls = 0;
        persistence.expect_save().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(UserError::Persistence("lost connection to the database".to_string()))
            } else {
                Ok(())
            }
        });
        let (mut manager, captured) =
            manager_with(&dir, InMemoryUserRepository::new(), persistence);

        let result = manager.add_user(ivan());
        assert!(matches!(result, Err(UserError::Persistence(_))));
        assert!(manager.is_empty().unwrap());
        assert!(manager.find_by_email("ivan@example.com").unwrap().is_none());

        let user = manager.add_user(ivan()).unwrap();
        assert_eq!(user.id(), 2);

        let log = log_lines(&dir);
        assert_eq!(log.len(), 1);
        assert!(log[0].ends_with(" - PersistenceError: Failed to save user: lost connection to the database"));
        assert_eq!(captured.count_of(COMPLETION_NOTICE), 2);
    }

    #[test]
    fn test_unexpected_error_is_logged_and_propagated() {
        let dir = TempDir::new().unwrap();
        let mut repository = MockUserRepository::new();
        repository.expect_email_exists().returning(|_| Ok(false));
        repository
            .expect_create()
            .returning(|_| Err(UserError::Internal("storage offline".to_string())));
        let mut persistence = MockPersistenceStep::new();
        persistence.expect_save().never();
        let (mut manager, captured) = manager_with(&dir, repository, persistence);

        let err = manager.add_user(ivan()).unwrap_err();

        assert!(!err.is_handled());
        let log = log_lines(&dir);
        assert_eq!(log.len(), 1);
        assert!(log[0].ends_with(" - UnexpectedError: Internal error: storage offline"));
        assert_eq!(
            captured.lines().last().map(String::as_str),
            Some(COMPLETION_NOTICE)
        );
    }

    #[test]
    fn test_failed_rollback_logs_save_error_and_propagates() {
        let dir = TempDir::new().unwrap();
        let mut repository = MockUserRepository::new();
        repository.expect_email_exists().returning(|_| Ok(false));
        repository.expect_create().returning(|user| Ok(user));
        repository
            .expect_remove()
            .times(1)
            .returning(|_| Err(UserError::Internal("storage offline".to_string())));
        let mut persistence = MockPersistenceStep::new();
        persistence.expect_save().returning(|_| {
            Err(UserError::Persistence("lost connection to the database".to_string()))
        });
        let (mut manager, captured) = manager_with(&dir, repository, persistence);

        let err = manager.add_user(ivan()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unexpected);
        let message = err.to_string();
        assert!(message.contains("lost connection to the database"));
        assert!(message.contains("storage offline"));

        let log = log_lines(&dir);
        assert_eq!(log.len(), 2);
        assert!(log[0].ends_with(
            " - PersistenceError: Failed to save user: lost connection to the database"
        ));
        assert!(log[1].contains(" - UnexpectedError: "));
        assert_eq!(captured.count_of(COMPLETION_NOTICE), 1);
    }

    #[test]
    fn test_email_check_failure_is_unexpected() {
        let dir = TempDir::new().unwrap();
        let mut repository = MockUserRepository::new();
        repository
            .expect_email_exists()
            .withf(|email| email.to_string() == "ivan@example.com")
            .returning(|_| Err(UserError::Internal("index corrupted".to_string())));
        repository.expect_create().never();
        let (mut manager, _captured) = manager_with(&dir, repository, saving());

        let err = manager.add_user(ivan()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }

    #[test]
    fn test_log_write_failure_is_reported_not_raised() {
        let dir = TempDir::new().unwrap();
        let (console, captured) = Console::memory();
        // a directory cannot be opened for appending
        let mut manager = UserManager::new(
            InMemoryUserRepository::new(),
            saving(),
            ErrorLog::new(dir.path()),
            console,
        );

        let result = manager.add_user(NewUser::new("", "", "", 10));

        assert!(matches!(result, Err(UserError::Validation(_))));
        assert!(captured
            .lines()
            .iter()
            .any(|l| l.starts_with("Failed to write to error log: ")));
        assert_eq!(captured.count_of(COMPLETION_NOTICE), 1);
    }

    #[test]
    fn test_in_memory_constructor() {
        let dir = TempDir::new().unwrap();
        let (console, _captured) = Console::memory();
        let mut manager = UserManager::in_memory(dir.path().join("errors.log"), 0.0, console);

        let user = manager.add_user(ivan()).unwrap();
        assert_eq!(manager.find_by_email("ivan@example.com").unwrap(), Some(user));
    }
}
