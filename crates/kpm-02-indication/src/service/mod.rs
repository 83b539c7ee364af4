//! Service layer

pub mod indication_processor;


pub use indication_processor::IndicationProcessor;
