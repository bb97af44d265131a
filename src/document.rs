//! Ingest: loosely typed tables, their cells, and the documents built from them.

pub mod converter;
pub mod document;
pub mod field_value;
pub mod table;
