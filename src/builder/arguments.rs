//! Argument table: every input and result a command can reference.
//!
//! IDs are handed out densely in allocation order and carry the tag of the
//! builder that minted them, so an ID presented to another builder is caught
//! instead of silently addressing the wrong slot.

use super::{TransactionBuilder, MAX_ARGUMENTS, MAX_INPUTS};
use crate::error::{Result, ValidationError};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use sui_ptb_transport::{ObjectInfo, ObjectOwner};
use sui_ptb_types::{Argument, CallArg, ObjectArg, ObjectRef};
use tracing::warn;

static NEXT_BUILDER_TAG: AtomicU64 = AtomicU64::new(1);

/// Opaque handle to an argument slot of one builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArgumentId {
    builder: u64,
    index: u32,
}

impl ArgumentId {
    /// Position in allocation order, starting at zero.
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for ArgumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Gas,
    Input(u16),
    /// `outputs` is the result arity when it is known without type information.
    Result {
        command: u16,
        outputs: Option<usize>,
    },
    NestedResult(u16, u16),
}

impl Slot {
    fn argument(self) -> Argument {
        match self {
            Slot::Gas => Argument::GasCoin,
            Slot::Input(i) => Argument::Input(i),
            Slot::Result { command, .. } => Argument::Result(command),
            Slot::NestedResult(command, sub) => Argument::NestedResult(command, sub),
        }
    }
}

pub(crate) struct ArgumentTable {
    tag: u64,
    slots: Vec<Slot>,
    gas: Option<ArgumentId>,
    inputs: Vec<CallArg>,
}

impl ArgumentTable {
    pub(crate) fn new() -> Self {
        Self {
            tag: NEXT_BUILDER_TAG.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
            gas: None,
            inputs: Vec::new(),
        }
    }

    fn allocate(&mut self, slot: Slot) -> Result<ArgumentId> {
        let full = || ValidationError::LimitExceeded {
            what: "arguments",
            limit: MAX_ARGUMENTS,
        };
        if self.slots.len() >= MAX_ARGUMENTS {
            return Err(full().into());
        }
        let index = u32::try_from(self.slots.len()).map_err(|_| full())?;
        self.slots.push(slot);
        Ok(ArgumentId {
            builder: self.tag,
            index,
        })
    }

    pub(crate) fn gas(&mut self) -> Result<ArgumentId> {
        if let Some(id) = self.gas {
            return Ok(id);
        }
        let id = self.allocate(Slot::Gas)?;
        self.gas = Some(id);
        Ok(id)
    }

    pub(crate) fn ensure_input_capacity(&self, additional: usize) -> Result<()> {
        if self.inputs.len() + additional > MAX_INPUTS {
            return Err(ValidationError::LimitExceeded {
                what: "inputs",
                limit: MAX_INPUTS,
            }
            .into());
        }
        Ok(())
    }

    /// Fail unless `additional` more IDs can be handed out.
    pub(crate) fn ensure_slot_capacity(&self, additional: usize) -> Result<()> {
        if self.slots.len() + additional > MAX_ARGUMENTS {
            return Err(ValidationError::LimitExceeded {
                what: "arguments",
                limit: MAX_ARGUMENTS,
            }
            .into());
        }
        Ok(())
    }

    pub(crate) fn push_input(&mut self, arg: CallArg) -> Result<ArgumentId> {
        self.ensure_input_capacity(1)?;
        let index = u16::try_from(self.inputs.len()).map_err(|_| ValidationError::LimitExceeded {
            what: "inputs",
            limit: MAX_INPUTS,
        })?;
        let id = self.allocate(Slot::Input(index))?;
        self.inputs.push(arg);
        Ok(id)
    }

    pub(crate) fn push_result(
        &mut self,
        command: u16,
        outputs: Option<usize>,
    ) -> Result<ArgumentId> {
        self.allocate(Slot::Result { command, outputs })
    }

    fn slot(&self, id: ArgumentId) -> Result<Slot> {
        if id.builder != self.tag {
            return Err(ValidationError::ForeignArgument { id }.into());
        }
        self.slots
            .get(id.index as usize)
            .copied()
            .ok_or_else(|| ValidationError::UnknownArgument { id }.into())
    }

    /// The sub-index is not checked against the command's outputs here; the
    /// ledger rejects out-of-range results when the transaction executes.
    pub(crate) fn nested(&mut self, base: ArgumentId, sub: u16) -> Result<ArgumentId> {
        match self.slot(base)? {
            Slot::Result { command, outputs } => {
                if let Some(outputs) = outputs {
                    if usize::from(sub) >= outputs {
                        warn!(
                            command,
                            sub, outputs, "nested result index beyond the command's outputs"
                        );
                    }
                }
                self.allocate(Slot::NestedResult(command, sub))
            }
            _ => Err(ValidationError::NotACommandResult { id: base }.into()),
        }
    }

    pub(crate) fn resolve(&self, id: ArgumentId) -> Result<Argument> {
        self.slot(id).map(Slot::argument)
    }

    pub(crate) fn resolve_all(&self, ids: &[ArgumentId]) -> Result<Vec<Argument>> {
        ids.iter().map(|id| self.resolve(*id)).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub(crate) fn into_inputs(self) -> Vec<CallArg> {
        self.inputs
    }
}

// =============================================================================
// Object inputs
// =============================================================================

/// How a transaction uses an object input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Owned,
    Immutable,
    Receiving,
    Shared { mutable: bool },
}

/// An object input in textual form, validated when added to a builder.
///
/// For shared objects `version` is the initial shared version and the digest
/// is not used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInput {
    pub object_id: String,
    pub version: u64,
    pub digest: Option<String>,
    pub kind: ObjectKind,
}

impl ObjectInput {
    pub fn owned(object_id: impl Into<String>, version: u64, digest: impl Into<String>) -> Self {
        Self::with_digest(object_id, version, digest, ObjectKind::Owned)
    }

    pub fn immutable(
        object_id: impl Into<String>,
        version: u64,
        digest: impl Into<String>,
    ) -> Self {
        Self::with_digest(object_id, version, digest, ObjectKind::Immutable)
    }

    pub fn receiving(
        object_id: impl Into<String>,
        version: u64,
        digest: impl Into<String>,
    ) -> Self {
        Self::with_digest(object_id, version, digest, ObjectKind::Receiving)
    }

    /// Mutable shared object.
    pub fn shared(object_id: impl Into<String>, initial_shared_version: u64) -> Self {
        Self {
            object_id: object_id.into(),
            version: initial_shared_version,
            digest: None,
            kind: ObjectKind::Shared { mutable: true },
        }
    }

    pub fn shared_read_only(object_id: impl Into<String>, initial_shared_version: u64) -> Self {
        Self {
            kind: ObjectKind::Shared { mutable: false },
            ..Self::shared(object_id, initial_shared_version)
        }
    }

    /// Pick the input kind from the owner reported by the ledger. Shared
    /// objects are used mutably. Objects owned by another object, or with an
    /// owner the ledger did not report, are rejected.
    pub fn from_object_info(info: &ObjectInfo) -> Result<Self> {
        let unusable = |owner| ValidationError::UnusableOwner {
            object_id: info.object_id.clone(),
            owner,
        };
        match info.owner {
            ObjectOwner::Address(_) => Ok(Self::owned(&info.object_id, info.version, &info.digest)),
            ObjectOwner::Immutable => {
                Ok(Self::immutable(&info.object_id, info.version, &info.digest))
            }
            ObjectOwner::Shared { initial_version } => {
                Ok(Self::shared(&info.object_id, initial_version))
            }
            ObjectOwner::Parent(_) => Err(unusable("object").into()),
            ObjectOwner::Unknown => Err(unusable("unknown").into()),
        }
    }

    fn with_digest(
        object_id: impl Into<String>,
        version: u64,
        digest: impl Into<String>,
        kind: ObjectKind,
    ) -> Self {
        Self {
            object_id: object_id.into(),
            version,
            digest: Some(digest.into()),
            kind,
        }
    }

    fn to_call_arg(&self) -> Result<CallArg> {
        let object_ref = || -> Result<ObjectRef> {
            let digest = self
                .digest
                .as_deref()
                .ok_or_else(|| ValidationError::MissingDigest {
                    object_id: self.object_id.clone(),
                })?;
            Ok(ObjectRef::parse(&self.object_id, self.version, digest)?)
        };
        let arg = match self.kind {
            ObjectKind::Owned | ObjectKind::Immutable => ObjectArg::ImmOrOwnedObject(object_ref()?),
            ObjectKind::Receiving => ObjectArg::Receiving(object_ref()?),
            ObjectKind::Shared { mutable } => ObjectArg::SharedObject {
                id: sui_ptb_types::encoding::parse_address(&self.object_id, "object ID")?,
                initial_shared_version: self.version,
                mutable,
            },
        };
        Ok(CallArg::Object(arg))
    }
}

impl TransactionBuilder {
    /// Add an object input. Fails without recording anything if the id or
    /// digest is malformed.
    pub fn input_object(&mut self, input: ObjectInput) -> Result<ArgumentId> {
        let arg = input.to_call_arg()?;
        self.arguments.push_input(arg)
    }

    /// The gas coin. Every call returns the same ID.
    pub fn gas_coin(&mut self) -> Result<ArgumentId> {
        self.arguments.gas()
    }

    /// Address output `sub` of the multi-output command that produced `base`.
    pub fn nested_result(&mut self, base: ArgumentId, sub: u16) -> Result<ArgumentId> {
        self.arguments.nested(base, sub)
    }
}
