//! SupplyChainContract: product lifecycle over the world state
//!
//! ## Design
//!
//! The contract is a plain struct holding only its codec. The ledger
//! capability is passed to every operation as a [`TransactionContext`], so the
//! same contract value can serve any number of transactions and never caches
//! world state between them.
//!
//! ## Operations
//!
//! - `init_ledger(ctx)` - seed the ledger with the bootstrap products
//! - `create_product(ctx, ...)` - add a new product, status "Created"
//! - `update_product(ctx, ...)` - replace status, owner, description, category
//! - `transfer_ownership(ctx, id, owner)` - change the owner only
//! - `query_product(ctx, id)` - read one product
//! - `product_exists(ctx, id)` - presence check, no decode
//! - `get_all_products(ctx)` / `list_all(ctx)` - full-range enumeration
//!
//! Every mutating operation performs its precondition read and exactly one
//! write. Conflicting concurrent transactions are resolved by the ledger at
//! commit; the contract does no locking of its own.

use supplychain_core::{Error, KeyValue, Result, TransactionContext};
use tracing::{debug, info};

use crate::codec::{JsonCodec, ProductCodec};
use crate::product::Product;

/// Status given to every product created through `create_product`
pub const INITIAL_STATUS: &str = "Created";

/// Bootstrap products written by `init_ledger`
///
/// Fields: id, name, status, owner, description, category.
pub const SEED_PRODUCTS: &[[&str; 6]] = &[[
    "p1",
    "Laptop",
    "Manufactured",
    "CompanyA",
    "High-end gaming laptop",
    "Electronics",
]];

/// Supply-chain product contract
pub struct SupplyChainContract {
    codec: Box<dyn ProductCodec>,
}

impl Default for SupplyChainContract {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SupplyChainContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupplyChainContract")
            .field("codec", &self.codec.codec_id())
            .finish()
    }
}

impl SupplyChainContract {
    /// Create a contract using the canonical JSON encoding
    pub fn new() -> Self {
        Self::with_codec(Box::new(JsonCodec))
    }

    /// Create a contract with an explicit codec
    pub fn with_codec(codec: Box<dyn ProductCodec>) -> Self {
        Self { codec }
    }

    /// Codec used for every read and write
    pub fn codec(&self) -> &dyn ProductCodec {
        self.codec.as_ref()
    }

    // ========== Operations ==========

    /// Seed the ledger with [`SEED_PRODUCTS`]
    ///
    /// Not idempotent: fails with `AlreadyExists` if a seed id is present.
    pub fn init_ledger<C: TransactionContext>(&self, ctx: &mut C) -> Result<()> {
        let now = ctx.current_timestamp()?;
        for [id, name, status, owner, description, category] in SEED_PRODUCTS.iter().copied() {
            let product = Product::new(id, name, status, owner, description, category, now);
            self.insert_new(ctx, &product)?;
        }
        info!(tx_id = %ctx.tx_id(), seeded = SEED_PRODUCTS.len(), "ledger initialized");
        Ok(())
    }

    /// Create a new product with status [`INITIAL_STATUS`]
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `id` is empty
    /// - `AlreadyExists` if a value is already stored under `id`
    pub fn create_product<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
        name: &str,
        owner: &str,
        description: &str,
        category: &str,
    ) -> Result<()> {
        if id.is_empty() {
            return Err(Error::invalid_argument("product id must not be empty"));
        }
        let now = ctx.current_timestamp()?;
        let product = Product::new(id, name, INITIAL_STATUS, owner, description, category, now);
        self.insert_new(ctx, &product)?;
        info!(tx_id = %ctx.tx_id(), id, owner, "product created");
        Ok(())
    }

    /// Replace a product's status, owner, description and category
    ///
    /// All four values are written as given; an empty string clears a field.
    /// `id`, `name` and `created_at` are preserved.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no product is stored under `id`
    /// - `Decode` if the stored value is not a valid product
    pub fn update_product<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
        new_status: &str,
        new_owner: &str,
        new_description: &str,
        new_category: &str,
    ) -> Result<()> {
        let mut product = self.read_product(ctx, id)?;
        product.status = new_status.to_string();
        product.owner = new_owner.to_string();
        product.description = new_description.to_string();
        product.category = new_category.to_string();
        // Never moves backwards, even for a backdated transaction
        product.updated_at = ctx.current_timestamp()?.max(product.updated_at);

        self.write_product(ctx, &product)?;
        info!(tx_id = %ctx.tx_id(), id, status = new_status, "product updated");
        Ok(())
    }

    /// Hand custody of a product to `new_owner`
    ///
    /// Only `owner` and `updated_at` change.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no product is stored under `id`
    /// - `Decode` if the stored value is not a valid product
    pub fn transfer_ownership<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
        new_owner: &str,
    ) -> Result<()> {
        let mut product = self.read_product(ctx, id)?;
        let previous_owner = std::mem::replace(&mut product.owner, new_owner.to_string());
        product.updated_at = ctx.current_timestamp()?.max(product.updated_at);

        self.write_product(ctx, &product)?;
        info!(
            tx_id = %ctx.tx_id(),
            id,
            from = %previous_owner,
            to = new_owner,
            "ownership transferred"
        );
        Ok(())
    }

    /// Read one product
    ///
    /// # Errors
    ///
    /// - `NotFound` if no product is stored under `id`
    /// - `Decode` if the stored value is not a valid product
    pub fn query_product<C: TransactionContext>(&self, ctx: &mut C, id: &str) -> Result<Product> {
        let product = self.read_product(ctx, id)?;
        debug!(tx_id = %ctx.tx_id(), id, "product queried");
        Ok(product)
    }

    /// Whether any value is stored under `id`
    ///
    /// Pure presence check: a corrupt value still counts as existing.
    pub fn product_exists<C: TransactionContext>(&self, ctx: &mut C, id: &str) -> Result<bool> {
        Ok(ctx.get_state(id)?.is_some())
    }

    /// Lazily enumerate every product in key order
    ///
    /// The returned iterator stops after the first error; collecting it into a
    /// `Result<Vec<_>>` gives all-or-nothing semantics (see [`list_all`]).
    /// The underlying scan is released as soon as the iterator finishes,
    /// fails, or is dropped.
    ///
    /// [`list_all`]: Self::list_all
    pub fn get_all_products<C: TransactionContext>(
        &self,
        ctx: &mut C,
    ) -> Result<ProductIter<'_, C::Scan>> {
        let scan = ctx.range_scan("", "")?;
        Ok(ProductIter {
            scan: Some(scan),
            codec: self.codec.as_ref(),
        })
    }

    /// Enumerate every product, failing as a whole on the first bad entry
    pub fn list_all<C: TransactionContext>(&self, ctx: &mut C) -> Result<Vec<Product>> {
        let products = self.get_all_products(ctx)?.collect::<Result<Vec<_>>>()?;
        debug!(tx_id = %ctx.tx_id(), count = products.len(), "products listed");
        Ok(products)
    }

    // ========== Helpers ==========

    /// Existence check followed by the single write of a new record
    fn insert_new<C: TransactionContext>(&self, ctx: &mut C, product: &Product) -> Result<()> {
        if self.product_exists(ctx, &product.id)? {
            return Err(Error::already_exists(&product.id));
        }
        self.write_product(ctx, product)
    }

    fn read_product<C: TransactionContext>(&self, ctx: &mut C, id: &str) -> Result<Product> {
        let bytes = ctx.get_state(id)?.ok_or_else(|| Error::not_found(id))?;
        decode_entry(self.codec.as_ref(), id, &bytes)
    }

    fn write_product<C: TransactionContext>(&self, ctx: &mut C, product: &Product) -> Result<()> {
        let bytes = self
            .codec
            .encode(product)
            .map_err(|e| e.for_key(&product.id))?;
        ctx.put_state(&product.id, bytes)
    }
}

/// Decode a stored value and check it belongs under `key`
fn decode_entry(codec: &dyn ProductCodec, key: &str, bytes: &[u8]) -> Result<Product> {
    let product = codec.decode(bytes).map_err(|e| e.for_key(key))?;
    if product.id != key {
        return Err(Error::Decode {
            key: key.to_string(),
            reason: format!("record for product {} stored under the wrong key", product.id),
        });
    }
    Ok(product)
}

/// Lazy, one-shot iterator over decoded products
///
/// Yields products in store key order. After yielding an error it yields
/// nothing more, and the scan it wraps has already been released.
pub struct ProductIter<'a, S> {
    /// `None` once finished or failed; dropping the scan releases it
    scan: Option<S>,
    codec: &'a dyn ProductCodec,
}

impl<S> std::fmt::Debug for ProductIter<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductIter")
            .field("open", &self.scan.is_some())
            .finish()
    }
}

impl<S> Iterator for ProductIter<'_, S>
where
    S: Iterator<Item = Result<KeyValue>>,
{
    type Item = Result<Product>;

    fn next(&mut self) -> Option<Self::Item> {
        let scan = self.scan.as_mut()?;
        let item = match scan.next() {
            None => {
                self.scan = None;
                return None;
            }
            Some(Ok(kv)) => decode_entry(self.codec, &kv.key, &kv.value),
            Some(Err(e)) => Err(e),
        };
        if item.is_err() {
            self.scan = None;
        }
        Some(item)
    }
}

impl<S> std::iter::FusedIterator for ProductIter<'_, S> where S: Iterator<Item = Result<KeyValue>> {}
