use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Macro preprocessing
    #[error("Missing macro name")]
    MissingMacroName,

    #[error("Re-defined macro: `{0}`")]
    MacroAlreadyDefined(String),

    #[error("Macro name is a command: `{0}`")]
    MacroNameIsCommand(String),

    // Labels
    #[error("Empty label declaration")]
    EmptyLabel,

    #[error("Invalid label: `{0}`")]
    InvalidLabelFormat(String),

    #[error("Label is a macro name: `{0}`")]
    LabelIsMacroName(String),

    #[error("Re-defined label: `{0}`")]
    LabelAlreadyDefined(String),

    #[error("Undefined label: `{0}`")]
    LabelNotFound(String),

    // Directives
    #[error("Missing argument after `.extern`")]
    ExternMissingArgument,

    #[error("Re-declared extern: `{0}`")]
    ExternNotUnique(String),

    #[error("Missing argument after `.entry`")]
    EntryMissingArgument,

    #[error("Re-declared entry: `{0}`")]
    EntryAlreadyDefined(String),

    #[error("`{0}` is declared both entry and extern")]
    ConflictingEntryAndExtern(String),

    #[error("Unknown directive: `.{0}`")]
    UnknownDirective(String),

    #[error("Missing data after `.{0}`")]
    MissingData(String),

    #[error("Invalid value in `.data`: `{0}`")]
    InvalidDataValue(String),

    #[error("Invalid `.string` operand: `{0}`")]
    InvalidStringFormat(String),

    // Commands
    #[error("Unknown command: `{0}`")]
    InvalidCommandName(String),

    #[error("Missing arguments for `{0}`")]
    MissingArguments(String),

    #[error("Extraneous text after end of command")]
    ExtraneousText,

    #[error("Invalid addressing for source operand: `{0}`")]
    InvalidSourceAddressing(String),

    #[error("Invalid addressing for destination operand: `{0}`")]
    InvalidDestAddressing(String),

    #[error("Invalid immediate value: `{0}`")]
    InvalidImmediateValue(String),

    #[error("Register out of bounds: `{0}`")]
    RegisterOutOfBounds(String),

    // Files
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),
}
