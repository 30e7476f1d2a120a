pub mod storage;

#[cfg(test)]
mod tests;
