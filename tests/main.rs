mod common;

mod namespace;
mod partition;
mod properties;
mod renames;
mod stubbed;
mod virtual_type;
