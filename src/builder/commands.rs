//! Command issuing.
//!
//! Every method validates all of its operands before touching the builder,
//! so a failed call leaves no command, input or argument behind.

use super::{ArgumentId, TransactionBuilder, MAX_COMMANDS};
use crate::error::{Error, Result, ValidationError};
use sui_ptb_types::encoding::{parse_address, parse_identifier, parse_type_tag};
use sui_ptb_types::{Argument, CallArg, Command, ObjectID, ProgrammableMoveCall};
use tracing::trace;

/// One Move call operand: an existing argument or a pure literal.
///
/// Exactly one of the two fields must be set; [`TransactionBuilder::move_call`]
/// rejects both and neither.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveCallArg {
    pub argument: Option<ArgumentId>,
    pub pure_bcs: Option<Vec<u8>>,
}

impl MoveCallArg {
    pub fn argument(id: ArgumentId) -> Self {
        Self {
            argument: Some(id),
            pure_bcs: None,
        }
    }

    /// Pre-encoded BCS bytes.
    pub fn pure(bcs_bytes: Vec<u8>) -> Self {
        Self {
            argument: None,
            pure_bcs: Some(bcs_bytes),
        }
    }
}

impl From<ArgumentId> for MoveCallArg {
    fn from(id: ArgumentId) -> Self {
        Self::argument(id)
    }
}

enum CallOperand<'a> {
    Existing(Argument),
    Literal(&'a [u8]),
}

fn require_non_empty<T>(items: &[T], command: &'static str, field: &'static str) -> Result<()> {
    if items.is_empty() {
        return Err(ValidationError::EmptyArguments { command, field }.into());
    }
    Ok(())
}

fn parse_dependencies(dependencies: &[&str]) -> Result<Vec<ObjectID>> {
    dependencies
        .iter()
        .map(|dep| parse_address(dep, "dependency").map_err(Error::from))
        .collect()
}

impl TransactionBuilder {
    fn ensure_command_capacity(&self) -> Result<u16> {
        if self.commands.len() >= MAX_COMMANDS {
            return Err(ValidationError::LimitExceeded {
                what: "commands",
                limit: MAX_COMMANDS,
            }
            .into());
        }
        u16::try_from(self.commands.len()).map_err(|_| {
            Error::from(ValidationError::LimitExceeded {
                what: "commands",
                limit: MAX_COMMANDS,
            })
        })
    }

    fn push_command(&mut self, command: Command) -> Result<u16> {
        let index = self.ensure_command_capacity()?;
        trace!(index, command = command.name(), "command issued");
        self.commands.push(command);
        Ok(index)
    }

    fn push_command_with_result(
        &mut self,
        command: Command,
        outputs: Option<usize>,
    ) -> Result<ArgumentId> {
        self.arguments.ensure_slot_capacity(1)?;
        let index = self.push_command(command)?;
        self.arguments.push_result(index, outputs)
    }

    /// Split `amounts` off `coin`. Returns the base ID of the new coins; address
    /// each one with [`TransactionBuilder::nested_result`].
    pub fn split_coins(&mut self, coin: ArgumentId, amounts: &[ArgumentId]) -> Result<ArgumentId> {
        require_non_empty(amounts, "SplitCoins", "amounts")?;
        let coin = self.arguments.resolve(coin)?;
        let amounts_args = self.arguments.resolve_all(amounts)?;
        self.push_command_with_result(
            Command::SplitCoins(coin, amounts_args),
            Some(amounts.len()),
        )
    }

    /// Merge `sources` into `target`.
    pub fn merge_coins(&mut self, target: ArgumentId, sources: &[ArgumentId]) -> Result<()> {
        require_non_empty(sources, "MergeCoins", "sources")?;
        let target = self.arguments.resolve(target)?;
        let sources = self.arguments.resolve_all(sources)?;
        self.push_command(Command::MergeCoins(target, sources))
            .map(|_| ())
    }

    pub fn transfer_objects(
        &mut self,
        objects: &[ArgumentId],
        recipient: ArgumentId,
    ) -> Result<()> {
        require_non_empty(objects, "TransferObjects", "objects")?;
        let objects = self.arguments.resolve_all(objects)?;
        let recipient = self.arguments.resolve(recipient)?;
        self.push_command(Command::TransferObjects(objects, recipient))
            .map(|_| ())
    }

    /// Build a `vector<T>` from `elements`. An empty or absent `type_tag`
    /// leaves the element type to be inferred by the ledger.
    pub fn make_move_vec(
        &mut self,
        type_tag: Option<&str>,
        elements: &[ArgumentId],
    ) -> Result<ArgumentId> {
        require_non_empty(elements, "MakeMoveVec", "elements")?;
        let type_tag = match type_tag.map(str::trim) {
            None | Some("") => None,
            Some(tag) => Some(parse_type_tag(tag)?),
        };
        let elements = self.arguments.resolve_all(elements)?;
        self.push_command_with_result(Command::MakeMoveVec(type_tag, elements), Some(1))
    }

    /// Call `package::module::function<type_arguments>(arguments)`.
    ///
    /// Pure literals among `arguments` become new inputs, allocated only once
    /// every operand has been validated.
    pub fn move_call(
        &mut self,
        package: &str,
        module: &str,
        function: &str,
        type_arguments: &[&str],
        arguments: Vec<MoveCallArg>,
    ) -> Result<ArgumentId> {
        let package = parse_address(package, "package")?;
        let module = parse_identifier(module)?;
        let function = parse_identifier(function)?;
        let type_arguments = type_arguments
            .iter()
            .map(|tag| parse_type_tag(tag).map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;

        let mut operands = Vec::with_capacity(arguments.len());
        for (index, arg) in arguments.iter().enumerate() {
            let operand = match (&arg.argument, &arg.pure_bcs) {
                (Some(id), None) => CallOperand::Existing(self.arguments.resolve(*id)?),
                (None, Some(bytes)) => CallOperand::Literal(bytes),
                (Some(_), Some(_)) => {
                    return Err(ValidationError::AmbiguousCallArgument {
                        index,
                        supplied: "both",
                    }
                    .into())
                }
                (None, None) => {
                    return Err(ValidationError::AmbiguousCallArgument {
                        index,
                        supplied: "neither",
                    }
                    .into())
                }
            };
            operands.push(operand);
        }

        let literals = operands
            .iter()
            .filter(|op| matches!(op, CallOperand::Literal(_)))
            .count();
        self.arguments.ensure_input_capacity(literals)?;
        self.arguments.ensure_slot_capacity(literals + 1)?;
        self.ensure_command_capacity()?;

        let mut call_arguments = Vec::with_capacity(operands.len());
        for operand in operands {
            let argument = match operand {
                CallOperand::Existing(argument) => argument,
                CallOperand::Literal(bytes) => {
                    let id = self.arguments.push_input(CallArg::Pure(bytes.to_vec()))?;
                    self.arguments.resolve(id)?
                }
            };
            call_arguments.push(argument);
        }

        let call = ProgrammableMoveCall {
            package,
            module,
            function,
            type_arguments,
            arguments: call_arguments,
        };
        self.push_command_with_result(Command::MoveCall(Box::new(call)), None)
    }

    /// Publish a package. Returns the upgrade capability.
    pub fn publish(&mut self, modules: Vec<Vec<u8>>, dependencies: &[&str]) -> Result<ArgumentId> {
        let dependencies = parse_dependencies(dependencies)?;
        self.push_command_with_result(Command::Publish(modules, dependencies), Some(1))
    }

    /// Upgrade `package` authorized by `ticket`. Returns the upgrade receipt.
    pub fn upgrade(
        &mut self,
        modules: Vec<Vec<u8>>,
        dependencies: &[&str],
        package: &str,
        ticket: ArgumentId,
    ) -> Result<ArgumentId> {
        let dependencies = parse_dependencies(dependencies)?;
        let package = parse_address(package, "package")?;
        let ticket = self.arguments.resolve(ticket)?;
        self.push_command_with_result(
            Command::Upgrade(modules, dependencies, package, ticket),
            Some(1),
        )
    }
}
