pub mod error;
pub mod markup;
pub mod page_fetcher;
pub mod pagination;
pub mod record_assembler;
pub mod tag_recorder;
pub mod token_classifier;
