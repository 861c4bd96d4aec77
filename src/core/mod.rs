pub mod character_gen;
pub mod llm;
pub mod logging;
