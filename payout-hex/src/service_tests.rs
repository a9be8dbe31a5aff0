//! PayoutService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use payout_types::{
        AccountType, AppError, BankAccount, BankTransfer, ChangeCompanyRequest, EmailError,
        EmailService, Invoicing, InvoicingProvider, PaymentAccount, PaymentDataRepository,
        PayoutOption, PayoutType, Paypal, ProviderError, RepoError, User, UserId, UserStore,
    };

    use crate::PayoutService;

    /// In-memory user store and payment data repository.
    pub struct MockRepo {
        users: Mutex<HashMap<UserId, User>>,
        /// user -> (serialized account, default tag)
        payment_data: Mutex<HashMap<UserId, (String, String)>>,
        stores: Mutex<usize>,
    }

    impl MockRepo {
        pub fn new() -> Self {
            Self {
                users: Mutex::new(HashMap::new()),
                payment_data: Mutex::new(HashMap::new()),
                stores: Mutex::new(0),
            }
        }

        fn seed_payment_data(&self, user_id: UserId, account: &PaymentAccount, tag: &str) {
            self.payment_data.lock().unwrap().insert(
                user_id,
                (serde_json::to_string(account).unwrap(), tag.to_string()),
            );
        }

        fn stored(&self, user_id: UserId) -> Option<(PaymentAccount, String)> {
            self.payment_data
                .lock()
                .unwrap()
                .get(&user_id)
                .map(|(snapshot, tag)| (serde_json::from_str(snapshot).unwrap(), tag.clone()))
        }

        fn store_count(&self) -> usize {
            *self.stores.lock().unwrap()
        }
    }

    #[async_trait]
    impl UserStore for MockRepo {
        async fn update_user(&self, user: &User) -> Result<(), RepoError> {
            self.users.lock().unwrap().insert(user.id, user.clone());
            Ok(())
        }

        async fn get_user_with_roles(&self, id: UserId) -> Result<User, RepoError> {
            self.users
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(RepoError::NotFound)
        }
    }

    #[async_trait]
    impl PaymentDataRepository for MockRepo {
        async fn get_user_payment_data(
            &self,
            user_id: UserId,
        ) -> Result<Option<Invoicing>, RepoError> {
            let row = self.payment_data.lock().unwrap().get(&user_id).cloned();
            row.map(|(snapshot, tag)| Invoicing::from_snapshot(user_id, snapshot, tag))
                .transpose()
        }

        async fn store_user_payment_type(
            &self,
            user_id: UserId,
            payment_account: &str,
            default_type: PayoutType,
        ) -> Result<(), RepoError> {
            *self.stores.lock().unwrap() += 1;
            self.payment_data.lock().unwrap().insert(
                user_id,
                (payment_account.to_string(), default_type.alias().to_string()),
            );
            Ok(())
        }
    }

    /// Invoicing provider that stages writes until `done`.
    pub struct MockProvider {
        accounts: Mutex<HashMap<UserId, PaymentAccount>>,
        pending: Mutex<Vec<PaymentAccount>>,
        calls: Mutex<Vec<&'static str>>,
        mask_iban: bool,
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self {
                accounts: Mutex::new(HashMap::new()),
                pending: Mutex::new(Vec::new()),
                calls: Mutex::new(Vec::new()),
                mask_iban: false,
            }
        }

        /// Provider that masks stored IBANs, like real invoicing systems do.
        fn masking() -> Self {
            Self {
                mask_iban: true,
                ..Self::new()
            }
        }

        fn account(&self, user_id: UserId) -> Option<PaymentAccount> {
            self.accounts.lock().unwrap().get(&user_id).cloned()
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl InvoicingProvider for MockProvider {
        async fn get_or_create_payment_account(
            &self,
            user_id: UserId,
        ) -> Result<PaymentAccount, ProviderError> {
            self.calls.lock().unwrap().push("get_or_create");
            Ok(self
                .accounts
                .lock()
                .unwrap()
                .entry(user_id)
                .or_insert_with(|| PaymentAccount::new(user_id))
                .clone())
        }

        async fn persist_payment_account(
            &self,
            _user_id: UserId,
            account: &PaymentAccount,
        ) -> Result<(), ProviderError> {
            self.calls.lock().unwrap().push("persist");
            self.pending.lock().unwrap().push(account.clone());
            Ok(())
        }

        async fn done(&self) -> Result<(), ProviderError> {
            self.calls.lock().unwrap().push("done");
            let pending: Vec<_> = self.pending.lock().unwrap().drain(..).collect();
            let mut accounts = self.accounts.lock().unwrap();
            for mut account in pending {
                if self.mask_iban {
                    if let Some(bank) = account.bank_account.as_mut() {
                        let last4 = bank.iban.len().saturating_sub(4);
                        bank.iban = format!("****{}", &bank.iban[last4..]);
                    }
                }
                accounts.insert(account.user_id, account);
            }
            Ok(())
        }
    }

    /// Provider whose writes always fail.
    pub struct FailingProvider;

    #[async_trait]
    impl InvoicingProvider for FailingProvider {
        async fn get_or_create_payment_account(
            &self,
            user_id: UserId,
        ) -> Result<PaymentAccount, ProviderError> {
            Ok(PaymentAccount::new(user_id))
        }

        async fn persist_payment_account(
            &self,
            _user_id: UserId,
            _account: &PaymentAccount,
        ) -> Result<(), ProviderError> {
            Err(ProviderError::Api {
                status: 503,
                message: "maintenance".into(),
            })
        }

        async fn done(&self) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    /// Email service returning a fixed list of failed recipients.
    pub struct MockMailer {
        failed: Vec<String>,
        sent: Mutex<Vec<(String, String, String)>>,
    }

    impl MockMailer {
        pub fn new() -> Self {
            Self::failing(Vec::new())
        }

        fn failing(failed: Vec<String>) -> Self {
            Self {
                failed,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<(String, String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EmailService for MockMailer {
        async fn send(
            &self,
            subject: &str,
            recipient: &str,
            body: &str,
        ) -> Result<Vec<String>, EmailError> {
            self.sent.lock().unwrap().push((
                subject.to_string(),
                recipient.to_string(),
                body.to_string(),
            ));
            Ok(self.failed.clone())
        }
    }

    type TestService = PayoutService<MockRepo, MockProvider, MockMailer>;

    fn service() -> TestService {
        PayoutService::new(MockRepo::new(), MockProvider::new(), MockMailer::new())
    }

    fn user() -> User {
        User::new(UserId::new(), "user@example.com")
    }

    fn bank_transfer() -> BankTransfer {
        BankTransfer {
            account_holder: "H".into(),
            bank_name: "N".into(),
            iban: "I".into(),
            bic: "B".into(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_get_settings_without_record_defaults_to_bank_transfer() {
        let service = service();

        let settings = service.get_settings(user()).await.unwrap();

        assert_eq!(settings.payout.option.default, "bank_transfer");
        assert_eq!(settings.payout.details.bank_transfer, BankTransfer::default());
        assert_eq!(settings.payout.details.paypal, Paypal::default());
    }

    #[tokio::test]
    async fn test_get_settings_copies_stored_record() {
        let service = service();
        let user = user();
        let mut account = PaymentAccount::new(user.id);
        account.bank_account = Some(BankAccount {
            iban: "C".into(),
            bic: "D".into(),
            bank_name: "B".into(),
            account_holder: "A".into(),
        });
        account.paypal_account = Some("e@x.com".into());
        service.repo().seed_payment_data(user.id, &account, "paypal");

        let settings = service.get_settings(user).await.unwrap();

        let bt = &settings.payout.details.bank_transfer;
        assert_eq!(
            (
                bt.account_holder.as_str(),
                bt.bank_name.as_str(),
                bt.iban.as_str(),
                bt.bic.as_str()
            ),
            ("A", "B", "C", "D")
        );
        assert_eq!(settings.payout.details.paypal.email, "e@x.com");
        assert_eq!(settings.payout.option.default, "paypal");
    }

    #[tokio::test]
    async fn test_get_settings_normalizes_names() {
        let service = service();
        let mut user = user();
        user.last_name = Some("Lovelace".into());

        let settings = service.get_settings(user.clone()).await.unwrap();

        assert_eq!(settings.user.id, user.id);
        assert_eq!(settings.user.first_name.as_deref(), Some(""));
        assert_eq!(settings.user.last_name.as_deref(), Some("Lovelace"));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Synchronization
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_save_bank_transfer_syncs_provider_and_local() {
        let service = service();
        let user_id = UserId::new();

        let returned = service
            .save_bank_transfer(user_id, bank_transfer())
            .await
            .unwrap();

        let account = service.provider().account(user_id).unwrap();
        assert_eq!(
            account.bank_account,
            Some(BankAccount {
                iban: "I".into(),
                bic: "B".into(),
                bank_name: "N".into(),
                account_holder: "H".into(),
            })
        );
        assert_eq!(account.default_account_type, Some(AccountType::BankAccount));
        assert_eq!(returned, account);

        let (snapshot, tag) = service.repo().stored(user_id).unwrap();
        assert_eq!(tag, "bank_transfer");
        assert_eq!(snapshot, account);
    }

    #[tokio::test]
    async fn test_save_bank_transfer_call_sequence() {
        let service = service();

        service
            .save_bank_transfer(UserId::new(), bank_transfer())
            .await
            .unwrap();

        assert_eq!(
            service.provider().calls(),
            vec!["get_or_create", "persist", "done", "get_or_create"]
        );
        assert_eq!(service.repo().store_count(), 1);
    }

    #[tokio::test]
    async fn test_save_bank_transfer_mirrors_refetched_account() {
        let service =
            PayoutService::new(MockRepo::new(), MockProvider::masking(), MockMailer::new());
        let user_id = UserId::new();
        let mut bt = bank_transfer();
        bt.iban = "DE89370400440532013000".into();

        let returned = service.save_bank_transfer(user_id, bt).await.unwrap();

        let (snapshot, _) = service.repo().stored(user_id).unwrap();
        let stored_iban = snapshot.bank_account.unwrap().iban;
        assert_eq!(stored_iban, "****3000");
        assert_eq!(returned.bank_account.unwrap().iban, "****3000");
    }

    #[tokio::test]
    async fn test_save_paypal_syncs_provider_and_local() {
        let service = service();
        let user_id = UserId::new();

        service
            .save_paypal(
                user_id,
                Paypal {
                    email: "p@x.com".into(),
                },
            )
            .await
            .unwrap();

        let account = service.provider().account(user_id).unwrap();
        assert_eq!(account.paypal_account.as_deref(), Some("p@x.com"));
        assert_eq!(account.default_account_type, Some(AccountType::PaypalAccount));

        let (_, tag) = service.repo().stored(user_id).unwrap();
        assert_eq!(tag, "paypal");
    }

    #[tokio::test]
    async fn test_save_paypal_keeps_bank_account() {
        let service = service();
        let user_id = UserId::new();
        service
            .save_bank_transfer(user_id, bank_transfer())
            .await
            .unwrap();

        service
            .save_paypal(
                user_id,
                Paypal {
                    email: "p@x.com".into(),
                },
            )
            .await
            .unwrap();

        let settings = service.get_settings(User::new(user_id, "u@x.com")).await.unwrap();
        assert_eq!(settings.payout.details.bank_transfer.iban, "I");
        assert_eq!(settings.payout.details.paypal.email, "p@x.com");
        assert_eq!(settings.payout.option.default, "paypal");
    }

    #[tokio::test]
    async fn test_provider_failure_skips_local_write() {
        let service = PayoutService::new(MockRepo::new(), FailingProvider, MockMailer::new());
        let user_id = UserId::new();

        let result = service.save_bank_transfer(user_id, bank_transfer()).await;

        assert!(matches!(result, Err(AppError::Provider(_))));
        assert_eq!(service.repo().store_count(), 0);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Default selection
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_save_default_payment_type_only_changes_flag() {
        let service = service();
        let user_id = UserId::new();
        service
            .save_bank_transfer(user_id, bank_transfer())
            .await
            .unwrap();

        service
            .save_default_payment_type(user_id, &PayoutOption::new(PayoutType::Paypal))
            .await
            .unwrap();

        let account = service.provider().account(user_id).unwrap();
        assert_eq!(account.default_account_type, Some(AccountType::PaypalAccount));
        assert_eq!(account.bank_account.unwrap().iban, "I");
        assert!(account.paypal_account.is_none());

        let (_, tag) = service.repo().stored(user_id).unwrap();
        assert_eq!(tag, "paypal");
    }

    #[tokio::test]
    async fn test_save_default_payment_type_invalid_option() {
        let service = service();
        let option = PayoutOption {
            default: "crypto".into(),
        };

        let result = service
            .save_default_payment_type(UserId::new(), &option)
            .await;

        assert!(matches!(result, Err(AppError::InvalidPaymentOption(tag)) if tag == "crypto"));
        assert!(service.provider().calls().is_empty());
        assert_eq!(service.repo().store_count(), 0);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validity
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_valid_payment_method_with_complete_bank_transfer() {
        let service = service();
        let user = user();
        service
            .save_bank_transfer(user.id, bank_transfer())
            .await
            .unwrap();

        assert!(service.has_user_set_valid_payment_method(user).await.unwrap());
    }

    #[tokio::test]
    async fn test_valid_payment_method_with_missing_bank_field() {
        let service = service();
        let user = user();
        let mut bt = bank_transfer();
        bt.bank_name.clear();
        service.save_bank_transfer(user.id, bt).await.unwrap();

        assert!(!service.has_user_set_valid_payment_method(user).await.unwrap());
    }

    #[tokio::test]
    async fn test_valid_payment_method_without_record() {
        let service = service();

        assert!(!service.has_user_set_valid_payment_method(user()).await.unwrap());
    }

    #[tokio::test]
    async fn test_valid_payment_method_checks_default_only() {
        let service = service();
        let user = user();
        service
            .save_paypal(
                user.id,
                Paypal {
                    email: "p@x.com".into(),
                },
            )
            .await
            .unwrap();

        assert!(service.has_user_set_valid_payment_method(user).await.unwrap());
    }

    #[tokio::test]
    async fn test_valid_payment_method_unknown_stored_tag() {
        let service = service();
        let user = user();
        service
            .repo()
            .seed_payment_data(user.id, &PaymentAccount::new(user.id), "crypto");

        let result = service.has_user_set_valid_payment_method(user).await;

        assert!(matches!(result, Err(AppError::InvalidPaymentOption(_))));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Company change
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_change_company_sends_notification() {
        let service = service();
        let user = user();
        let req = ChangeCompanyRequest {
            company_name: "Acme".into(),
        };

        service
            .change_company(&user, &req, "production", "ops@example.com")
            .await
            .unwrap();

        let sent = service.mailer().sent();
        assert_eq!(sent.len(), 1);
        let (subject, recipient, body) = &sent[0];
        assert_eq!(recipient, "ops@example.com");
        assert!(subject.contains("production"));
        assert!(body.contains("Acme"));
        assert!(service.provider().calls().is_empty());
        assert_eq!(service.repo().store_count(), 0);
    }

    #[tokio::test]
    async fn test_change_company_failed_recipients() {
        let service = PayoutService::new(
            MockRepo::new(),
            MockProvider::new(),
            MockMailer::failing(vec!["ops@example.com".into()]),
        );
        let req = ChangeCompanyRequest {
            company_name: "Acme".into(),
        };

        let result = service
            .change_company(&user(), &req, "production", "ops@example.com")
            .await;

        assert!(matches!(result, Err(AppError::EmailDeliveryFailure(_))));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_save_and_get_user() {
        let service = service();
        let mut user = user();
        user.first_name = Some("Ada".into());
        user.roles = vec!["ROLE_USER".into()];

        service.save_user(&user).await.unwrap();
        let fetched = service.get_user(user.id).await.unwrap();

        assert_eq!(fetched, user);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let service = service();

        let result = service.get_user(UserId::new()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
