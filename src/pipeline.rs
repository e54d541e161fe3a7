//! End-to-end execution pipeline.
//!
//! ```text
//! Configuring -> DraftBuilt -> Simulated -> BudgetFinalized -> Rebuilt -> Signed -> Submitted
//! ```
//!
//! Each arrow is one method. A failing step, or a step called out of order,
//! leaves the pipeline `Aborted`: every later call fails with
//! [`StateError::Aborted`] and nothing reaches the executor. `submit`
//! consumes the pipeline.

use crate::builder::BuiltTransaction;
use crate::error::{Error, Result, SignatureError, StateError};
use crate::gas::{estimate_gas_budget, simulate_transaction, GasEstimate};
use crate::keys::TransactionSigner;
use crate::plan::{build_transaction, TransactionPlan};
use crate::signer::{
    parse_serialized_signature, sign_transaction, verify_signature, SignedTransaction,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use sui_ptb_transport::{with_deadline, ExecutionResponse, SimulationOutcome, TransactionExecutor};
use sui_ptb_types::env_utils::env_duration_secs;
use sui_ptb_types::{SerializedSignature, TransactionDigest, TransactionStatus};
use tokio::time::Instant;
use tracing::{info, warn};

/// Environment variable holding the default deadline, in seconds.
pub const DEADLINE_ENV: &str = "SUI_PTB_DEADLINE_SECS";
pub const DEFAULT_DEADLINE_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Configuring,
    DraftBuilt,
    Simulated,
    BudgetFinalized,
    Rebuilt,
    Signed,
    Submitted,
    Aborted,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Configuring => "Configuring",
            Stage::DraftBuilt => "DraftBuilt",
            Stage::Simulated => "Simulated",
            Stage::BudgetFinalized => "BudgetFinalized",
            Stage::Rebuilt => "Rebuilt",
            Stage::Signed => "Signed",
            Stage::Submitted => "Submitted",
            Stage::Aborted => "Aborted",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum State {
    Configuring,
    DraftBuilt {
        draft: BuiltTransaction,
    },
    Simulated {
        outcome: SimulationOutcome,
    },
    BudgetFinalized {
        estimate: GasEstimate,
    },
    Rebuilt {
        estimate: GasEstimate,
        transaction: BuiltTransaction,
    },
    Signed {
        estimate: GasEstimate,
        transaction: BuiltTransaction,
        signed: SignedTransaction,
    },
    Aborted,
}

impl State {
    fn stage(&self) -> Stage {
        match self {
            State::Configuring => Stage::Configuring,
            State::DraftBuilt { .. } => Stage::DraftBuilt,
            State::Simulated { .. } => Stage::Simulated,
            State::BudgetFinalized { .. } => Stage::BudgetFinalized,
            State::Rebuilt { .. } => Stage::Rebuilt,
            State::Signed { .. } => Stage::Signed,
            State::Aborted => Stage::Aborted,
        }
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub estimate: GasEstimate,
    pub digest: TransactionDigest,
    pub signed: SignedTransaction,
    pub response: ExecutionResponse,
}

pub struct ExecutionPipeline<P, E: ?Sized> {
    plan: P,
    executor: Arc<E>,
    deadline: Option<Instant>,
    state: State,
}

impl<P, E> ExecutionPipeline<P, E>
where
    P: TransactionPlan,
    E: TransactionExecutor + ?Sized,
{
    /// A pipeline without a deadline.
    pub fn new(plan: P, executor: Arc<E>) -> Self {
        Self {
            plan,
            executor,
            deadline: None,
            state: State::Configuring,
        }
    }

    /// A pipeline whose deadline is read from `SUI_PTB_DEADLINE_SECS`
    /// (default 60s), counted from now.
    pub fn from_env(plan: P, executor: Arc<E>) -> Self {
        let timeout = env_duration_secs(DEADLINE_ENV, DEFAULT_DEADLINE_SECS);
        Self::new(plan, executor).with_timeout(timeout)
    }

    /// Bound every network step by `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    pub fn plan(&self) -> &P {
        &self.plan
    }

    /// Take the state, leaving `Aborted` behind until the step succeeds.
    fn take(&mut self) -> State {
        std::mem::replace(&mut self.state, State::Aborted)
    }

    fn advance(&mut self, next: State) {
        info!(stage = %next.stage(), "pipeline advanced");
        self.state = next;
    }

    fn misuse(operation: &'static str, found: Stage) -> Error {
        if found == Stage::Aborted {
            return StateError::Aborted { operation }.into();
        }
        warn!(operation, stage = %found, "pipeline step called out of order");
        StateError::UnexpectedStage {
            operation,
            stage: found.as_str(),
        }
        .into()
    }

    fn abort(operation: &'static str, err: Error) -> Error {
        warn!(operation, kind = ?err.kind(), error = %err, "pipeline aborted");
        err
    }

    /// Build the transaction with the payment's draft budget.
    pub fn build_draft(&mut self) -> Result<TransactionDigest> {
        const OP: &str = "build draft";
        match self.take() {
            State::Configuring => {}
            other => return Err(Self::misuse(OP, other.stage())),
        }
        let draft = build_transaction(&self.plan, self.plan.gas_payment().budget())
            .map_err(|e| Self::abort(OP, e))?;
        let digest = draft.digest();
        self.advance(State::DraftBuilt { draft });
        Ok(digest)
    }

    /// Dry-run the draft. A failed dry run aborts the pipeline.
    pub async fn simulate(&mut self) -> Result<SimulationOutcome> {
        const OP: &str = "simulate";
        let draft = match self.take() {
            State::DraftBuilt { draft } => draft,
            other => return Err(Self::misuse(OP, other.stage())),
        };
        let outcome = simulate_transaction(self.executor.as_ref(), &draft, self.deadline)
            .await
            .map_err(|e| Self::abort(OP, e))?;
        if let TransactionStatus::Failure { error } = &outcome.status {
            let err = Error::Simulation {
                error: error.clone(),
            };
            return Err(Self::abort(OP, err));
        }
        self.advance(State::Simulated {
            outcome: outcome.clone(),
        });
        Ok(outcome)
    }

    /// Turn the dry-run costs into the final budget.
    pub fn finalize_budget(&mut self) -> Result<GasEstimate> {
        const OP: &str = "finalize budget";
        let outcome = match self.take() {
            State::Simulated { outcome } => outcome,
            other => return Err(Self::misuse(OP, other.stage())),
        };
        let estimate = estimate_gas_budget(&outcome).map_err(|e| Self::abort(OP, e))?;
        self.advance(State::BudgetFinalized { estimate });
        Ok(estimate)
    }

    /// Build the transaction again with the final budget.
    pub fn rebuild(&mut self) -> Result<TransactionDigest> {
        const OP: &str = "rebuild";
        let estimate = match self.take() {
            State::BudgetFinalized { estimate } => estimate,
            other => return Err(Self::misuse(OP, other.stage())),
        };
        let transaction =
            build_transaction(&self.plan, estimate.budget).map_err(|e| Self::abort(OP, e))?;
        let digest = transaction.digest();
        self.advance(State::Rebuilt {
            estimate,
            transaction,
        });
        Ok(digest)
    }

    pub fn sign(&mut self, signer: &dyn TransactionSigner) -> Result<SignedTransaction> {
        const OP: &str = "sign";
        let (estimate, transaction) = match self.take() {
            State::Rebuilt {
                estimate,
                transaction,
            } => (estimate, transaction),
            other => return Err(Self::misuse(OP, other.stage())),
        };
        let signed =
            sign_transaction(transaction.bytes(), signer).map_err(|e| Self::abort(OP, e))?;
        self.advance(State::Signed {
            estimate,
            transaction,
            signed: signed.clone(),
        });
        Ok(signed)
    }

    /// Submit the signed transaction. The signature is checked again first,
    /// so a malformed one never reaches the network.
    pub async fn submit(mut self) -> Result<PipelineOutcome> {
        const OP: &str = "submit";
        let (estimate, transaction, signed) = match self.take() {
            State::Signed {
                estimate,
                transaction,
                signed,
            } => (estimate, transaction, signed),
            other => return Err(Self::misuse(OP, other.stage())),
        };

        let signature =
            revalidate(transaction.bytes(), &signed).map_err(|e| Self::abort(OP, e))?;
        let response = with_deadline(
            self.deadline,
            "execute transaction",
            self.executor
                .execute_transaction(transaction.bytes(), &signature, self.deadline),
        )
        .await
        .map_err(|e| Self::abort(OP, Error::rpc("execute transaction", e)))?;

        let digest = transaction.digest();
        info!(
            stage = %Stage::Submitted,
            digest = %digest,
            budget = estimate.budget,
            "transaction submitted"
        );
        Ok(PipelineOutcome {
            estimate,
            digest,
            signed,
            response,
        })
    }

    /// Drive every step from `Configuring` to `Submitted`.
    pub async fn run(mut self, signer: &dyn TransactionSigner) -> Result<PipelineOutcome> {
        self.build_draft()?;
        self.simulate().await?;
        self.finalize_budget()?;
        self.rebuild()?;
        self.sign(signer)?;
        self.submit().await
    }
}

fn revalidate(tx_bytes: &[u8], signed: &SignedTransaction) -> Result<SerializedSignature> {
    let signature = parse_serialized_signature(&signed.signature)?;
    if signed.decode_tx_bytes()? != tx_bytes {
        return Err(Error::encoding(
            "submit",
            "signed bytes differ from the rebuilt transaction",
        ));
    }
    match verify_signature(tx_bytes, &signature) {
        Ok(()) | Err(Error::Signature(SignatureError::VerificationUnsupported(_))) => Ok(signature),
        Err(e) => Err(e),
    }
}
