//! Record id minting.

/// Mints ids for one batch of generated records.
///
/// Every batch gets a fresh random component, and each record in the batch
/// is distinguished by its position, so ids never collide across batches.
///
/// # Examples
///
/// ```
/// use edugenie_core::IdMinter;
///
/// let minter = IdMinter::new("card");
/// let first = minter.mint(0);
/// let second = minter.mint(1);
///
/// assert!(first.starts_with("card-"));
/// assert!(first.ends_with("-0"));
/// assert_ne!(first, second);
/// assert_ne!(first, IdMinter::new("card").mint(0));
/// ```
#[derive(Debug, Clone)]
pub struct IdMinter {
    prefix: &'static str,
    batch: String,
}

impl IdMinter {
    /// Starts a new batch for the given id prefix.
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            batch: uuid::Uuid::new_v4().simple().to_string(),
        }
    }

    /// Returns the id for the record at `index` within this batch.
    pub fn mint(&self, index: usize) -> String {
        format!("{}-{}-{}", self.prefix, self.batch, index)
    }
}
