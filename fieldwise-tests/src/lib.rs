pub mod laws;
pub mod records;

#[cfg(test)]
mod scenarios;
