use std::collections::HashMap;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::Once;

use async_trait::async_trait;
use authoriser::auth::authoriser::Authoriser;
use authoriser::auth::errors::BackendError;
use authoriser::auth::models::AccountRecord;
use authoriser::auth::models::FieldAssignment;
use authoriser::auth::models::Operation;
use authoriser::auth::password::PasswordPolicy;
use authoriser::auth::ports::BackendPort;
use authoriser::auth::sections;
use authoriser::auth::sections::ChangeSection;
use authoriser::auth::sections::ForgotSection;
use authoriser::auth::sections::LoginSection;
use authoriser::auth::sections::Section;
use authoriser::auth::sections::SignUpSection;
use authoriser::outbound::MemorySessionStore;
use authoriser::outbound::StaticChoice;
use fields::Field;
use fields::FieldControl;
use fields::FieldSet;
use fields::MemoryControl;

static TRACING: Once = Once::new();

/// Initialise tracing once for the whole test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .init();
    });
}

/// A mail captured by the test backend.
#[derive(Debug, Clone)]
pub struct Mail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// In-memory backend standing in for the remote executor.
///
/// "Hashing" is a reversible marker, good enough to assert that only hashes
/// are ever persisted. Every port call is counted so tests can assert that
/// local validation short-circuits before the backend is touched.
#[derive(Debug, Default)]
pub struct TestBackend {
    accounts: Mutex<HashMap<String, AccountRecord>>,
    next_id: AtomicI64,
    mails: Mutex<Vec<Mail>>,
    calls: AtomicUsize,
}

impl TestBackend {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Self::default()
        }
    }

    /// Insert an account as if it had signed up earlier.
    pub fn seed(&self, name: &str, password: &str, email: &str) -> AccountRecord {
        let account = AccountRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: name.to_string(),
            password_hash: fake_hash(password),
            email: email.to_string(),
        };
        self.accounts
            .lock()
            .unwrap()
            .insert(name.to_string(), account.clone());
        account
    }

    pub fn account(&self, name: &str) -> Option<AccountRecord> {
        self.accounts.lock().unwrap().get(name).cloned()
    }

    pub fn mails(&self) -> Vec<Mail> {
        self.mails.lock().unwrap().clone()
    }

    /// Total number of port calls made so far.
    pub fn backend_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn fake_hash(plain: &str) -> String {
    format!("hashed({})", plain)
}

#[async_trait]
impl BackendPort for TestBackend {
    async fn find_account(&self, name: &str) -> Result<Option<AccountRecord>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.account(name))
    }

    async fn hash_password(&self, plain: &str) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(fake_hash(plain))
    }

    async fn verify_password(&self, plain: &str, hash: &str) -> Result<bool, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(fake_hash(plain) == hash)
    }

    async fn store_fields(
        &self,
        name: &str,
        assignments: &[FieldAssignment],
    ) -> Result<(), BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .entry(name.to_string())
            .or_insert_with(|| AccountRecord {
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
                name: name.to_string(),
                password_hash: String::new(),
                email: String::new(),
            });
        for assignment in assignments {
            match assignment.column.as_str() {
                "password" => account.password_hash = assignment.value.clone(),
                "name" => account.name = assignment.value.clone(),
                "email" => account.email = assignment.value.clone(),
                other => {
                    return Err(BackendError::Call(format!("unknown column: {}", other)));
                }
            }
        }
        Ok(())
    }

    async fn send_mail(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.mails.lock().unwrap().push(Mail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// A whole page: four sections over memory controls, a radio group, a session
/// store, and the authoriser wired across them.
pub struct TestPage {
    pub backend: Arc<TestBackend>,
    pub choice: Arc<StaticChoice>,
    pub store: MemorySessionStore,
    pub authoriser: Authoriser<MemorySessionStore>,
    controls: HashMap<(Operation, String), Arc<MemoryControl>>,
}

impl TestPage {
    /// Build a fresh page over a fresh backend and store.
    pub fn spawn() -> Self {
        Self::over(Arc::new(TestBackend::new()), MemorySessionStore::new())
    }

    /// Build a page over an existing backend and store, as a reload would.
    pub fn over(backend: Arc<TestBackend>, store: MemorySessionStore) -> Self {
        init_tracing();

        let mut controls = HashMap::new();
        let mut bind = |operation: Operation| -> FieldSet {
            let mut set = FieldSet::new();
            for spec in sections::field_specs(operation) {
                let control = Arc::new(MemoryControl::new());
                controls.insert((operation, spec.name().to_string()), control.clone());
                set.insert(Field::new(spec, control)).unwrap();
            }
            set
        };

        let section_list: Vec<Arc<dyn Section>> = vec![
            Arc::new(LoginSection::new(backend.clone(), bind(Operation::Login)).unwrap()),
            Arc::new(SignUpSection::new(backend.clone(), bind(Operation::SignUp)).unwrap()),
            Arc::new(
                ForgotSection::new(
                    backend.clone(),
                    bind(Operation::Forgot),
                    PasswordPolicy::default(),
                )
                .unwrap(),
            ),
            Arc::new(ChangeSection::new(backend.clone(), bind(Operation::Change)).unwrap()),
        ];

        let choice = Arc::new(StaticChoice::new());
        let authoriser = Authoriser::new(section_list, choice.clone(), store.clone());

        Self {
            backend,
            choice,
            store,
            authoriser,
            controls,
        }
    }

    /// Check one radio option, as the user would.
    pub fn select(&self, operation: Operation) {
        self.choice.select(operation);
        self.authoriser.on_choice_changed();
    }

    /// Type into a field.
    pub fn set(&self, operation: Operation, field: &str, value: &str) {
        self.control(operation, field).set_value(value);
    }

    /// Read a field's error slot.
    pub fn error(&self, operation: Operation, field: &str) -> String {
        self.control(operation, field).error()
    }

    fn control(&self, operation: Operation, field: &str) -> &Arc<MemoryControl> {
        self.controls
            .get(&(operation, field.to_string()))
            .unwrap_or_else(|| panic!("no control for {}.{}", operation, field))
    }
}
