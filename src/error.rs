use crate::memory::TypeAddr;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("program is {size} bytes, at most {max} bytes fit above the load address")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("call stack overflow at {pc:#05x}")]
    StackOverflow { pc: TypeAddr },

    #[error("return with empty call stack at {pc:#05x}")]
    StackUnderflow { pc: TypeAddr },
}

pub type Result<T> = std::result::Result<T, Error>;
