pub mod answer;
pub mod document;
