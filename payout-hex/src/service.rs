//! Payout Application Service
//!
//! Orchestrates the local repository, the invoicing provider and the email
//! service through their ports. Contains NO infrastructure logic - pure
//! business orchestration.

use payout_types::{
    AppError, BankTransfer, ChangeCompanyRequest, CompanyChangeNotification,
    EMAIL_DELIVERY_FAILURE, EmailService, InvoicingProvider, PaymentAccount,
    PaymentDataRepository, Payout, PayoutDetails, PayoutMethod, PayoutOption, PayoutType, Paypal,
    RepoError, Settings, User, UserId, UserStore,
};

/// Application service for payout settings.
///
/// Generic over the local repository `R`, the invoicing provider `P` and the
/// email service `E`; adapters are injected at compile time.
///
/// Saves write to the provider first and then mirror the result locally.
/// There is no shared transaction: if the local write fails after the
/// provider commit, the two records diverge until the next save.
pub struct PayoutService<R, P, E>
where
    R: UserStore + PaymentDataRepository,
    P: InvoicingProvider,
    E: EmailService,
{
    repo: R,
    provider: P,
    mailer: E,
}

impl<R, P, E> PayoutService<R, P, E>
where
    R: UserStore + PaymentDataRepository,
    P: InvoicingProvider,
    E: EmailService,
{
    /// Creates a new payout service with the given adapters.
    pub fn new(repo: R, provider: P, mailer: E) -> Self {
        Self {
            repo,
            provider,
            mailer,
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns a reference to the invoicing provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns a reference to the email service.
    pub fn mailer(&self) -> &E {
        &self.mailer
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────────────

    /// Persists the user unchanged.
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn save_user(&self, user: &User) -> Result<(), AppError> {
        self.repo.update_user(user).await.map_err(Into::into)
    }

    /// Gets a user with roles by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AppError> {
        self.repo
            .get_user_with_roles(user_id)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => AppError::NotFound(format!("User {}", user_id)),
                other => other.into(),
            })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────────

    /// Assembles the current payout settings of a user.
    ///
    /// Users without a local payment record get empty payout details with
    /// bank transfer as default. Missing names are normalized to empty
    /// strings on the returned user.
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn get_settings(&self, mut user: User) -> Result<Settings, AppError> {
        let payout = match self.repo.get_user_payment_data(user.id).await? {
            Some(record) => Payout {
                details: PayoutDetails {
                    bank_transfer: record.bank_transfer,
                    paypal: record.paypal,
                },
                option: PayoutOption {
                    default: record.default_type,
                },
            },
            None => {
                tracing::debug!("no payment record, defaulting to bank transfer");
                Payout::default()
            }
        };

        user.normalize_names();

        Ok(Settings { user, payout })
    }

    /// Checks whether every field of the default payout method is filled in.
    ///
    /// Fails with `InvalidPaymentOption` when the stored default tag is not
    /// a known payout type.
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn has_user_set_valid_payment_method(&self, user: User) -> Result<bool, AppError> {
        let settings = self.get_settings(user).await?;
        let payout_type = settings.payout.option.payout_type()?;

        Ok(settings.payout.details.is_complete(payout_type))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Payment account synchronization
    // ─────────────────────────────────────────────────────────────────────────────

    /// Saves a bank account as the default payout method.
    ///
    /// Returns the provider account as re-read after the commit.
    pub async fn save_bank_transfer(
        &self,
        user_id: UserId,
        bank_transfer: BankTransfer,
    ) -> Result<PaymentAccount, AppError> {
        self.save_payment_account(user_id, PayoutMethod::BankTransfer(bank_transfer)).await
    }

    /// Saves a PayPal account as the default payout method.
    pub async fn save_paypal(&self, user_id: UserId, paypal: Paypal) -> Result<(), AppError> {
        self.save_payment_account(user_id, PayoutMethod::Paypal(paypal)).await?;
        Ok(())
    }

    /// Changes which payout type is the default, leaving account details alone.
    #[tracing::instrument(skip(self, option), fields(default = %option.default))]
    pub async fn save_default_payment_type(
        &self,
        user_id: UserId,
        option: &PayoutOption,
    ) -> Result<(), AppError> {
        let payout_type = option.payout_type().inspect_err(|e| {
            tracing::warn!(error = %e, "rejected default payout type");
        })?;

        let account = self.provider.get_or_create_payment_account(user_id).await?;
        self.commit_payment_account(user_id, account, payout_type).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, method), fields(payout_type = %method.payout_type()))]
    async fn save_payment_account(
        &self,
        user_id: UserId,
        method: PayoutMethod,
    ) -> Result<PaymentAccount, AppError> {
        let mut account = self.provider.get_or_create_payment_account(user_id).await?;
        let payout_type = account.attach(method);

        self.commit_payment_account(user_id, account, payout_type).await
    }

    /// Sets the default flag, writes the account to the provider, re-reads it
    /// and mirrors the re-read snapshot locally.
    async fn commit_payment_account(
        &self,
        user_id: UserId,
        mut account: PaymentAccount,
        payout_type: PayoutType,
    ) -> Result<PaymentAccount, AppError> {
        account.set_default(payout_type);

        self.provider.persist_payment_account(user_id, &account).await?;
        self.provider.done().await?;

        // The provider may normalize what it stores; mirror its view.
        let refreshed = self.provider.get_or_create_payment_account(user_id).await?;
        let snapshot =
            serde_json::to_string(&refreshed).map_err(|e| AppError::Internal(e.to_string()))?;

        self.repo
            .store_user_payment_type(user_id, &snapshot, payout_type)
            .await?;

        tracing::info!(%user_id, default = %payout_type, "payment account synchronized");
        Ok(refreshed)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Notifications
    // ─────────────────────────────────────────────────────────────────────────────

    /// Notifies operators that a user wants to change company.
    #[tracing::instrument(skip(self, user, req), fields(user_id = %user.id))]
    pub async fn change_company(
        &self,
        user: &User,
        req: &ChangeCompanyRequest,
        environment: &str,
        email_to: &str,
    ) -> Result<(), AppError> {
        let message = CompanyChangeNotification::new(user, req, environment);

        let failed = self
            .mailer
            .send(&message.subject, email_to, &message.body)
            .await?;

        if !failed.is_empty() {
            tracing::error!(?failed, "company change notification not delivered");
            return Err(AppError::EmailDeliveryFailure(
                EMAIL_DELIVERY_FAILURE.to_string(),
            ));
        }

        Ok(())
    }
}
