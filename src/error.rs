use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Lex error: unrecognized character '{character}' at byte {position}")]
    Lex { position: usize, character: char },
    #[error("Parse error in \"{input}\": {reason} (at byte {position})")]
    Parse {
        input: String,
        reason: String,
        position: usize,
    },
    #[error("Not a paradigm (cardinal 1): {script}")]
    NotAParadigm { script: String },
    #[error("Not a root paradigm: {script}")]
    NotARootParadigm { script: String },
    #[error("Term not found in dictionary: {script}")]
    TermNotFound { script: String },
    #[error("Unknown relation kind: {name}")]
    UnknownRelationKind { name: String },
    #[error("Dictionary build error: {0}")]
    Build(String),
}

pub type Result<T> = std::result::Result<T, ScriptError>;
