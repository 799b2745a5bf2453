//! The delivery-preference store.
//!
//! Holds the delivery-vs-pickup choice, the selected address or branch, and
//! the user's saved address and branch lists. State is persisted to local
//! storage on every mutation for instant rehydration, and mirrored to the
//! remote profile where it applies. The two copies may transiently
//! disagree: local writes land first and remote sync is best-effort.
//!
//! Reconciliation is last-writer-wins by the monotonic preference
//! `version`, not by arrival order. Every local mutation of the mode or
//! pickup branch bumps the version; a remote snapshot only overwrites local
//! state when its version is at least as new.

use tracing::{debug, warn};

use samovar_core::{Address, AddressId, Branch, DeliveryPreference, FulfillmentMode};

use crate::api::{ApiClient, ApiError, NewAddress, Profile, ProfileUpdate};
use crate::storage::{LocalStore, keys};

/// The delivery-preference store: preference, address book, branch list.
#[derive(Debug)]
pub struct DeliveryStore {
    preference: DeliveryPreference,
    addresses: Vec<Address>,
    branches: Vec<Branch>,
    store: LocalStore,
    api: ApiClient,
}

impl DeliveryStore {
    /// Open the store, hydrating synchronously from local storage so the
    /// first render has data before any network round trip.
    ///
    /// Missing or corrupt keys degrade to defaults; corruption is logged.
    #[must_use]
    pub fn open(store: LocalStore, api: ApiClient) -> Self {
        let mode = hydrate_key::<String>(&store, keys::DELIVERY_TYPE)
            .and_then(|raw| raw.parse::<FulfillmentMode>().ok());
        let selected_address = hydrate_key(&store, keys::SELECTED_ADDRESS);
        let selected_branch = hydrate_key(&store, keys::SELECTED_BRANCH);
        let addresses = hydrate_key(&store, keys::USER_ADDRESSES).unwrap_or_default();
        let branches = hydrate_key(&store, keys::USER_BRANCHES).unwrap_or_default();
        let version = hydrate_key(&store, keys::PREFERENCE_VERSION).unwrap_or(0);

        Self {
            preference: DeliveryPreference {
                mode,
                selected_address,
                selected_branch,
                version,
            },
            addresses,
            branches,
            store,
            api,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    #[must_use]
    pub const fn preference(&self) -> &DeliveryPreference {
        &self.preference
    }

    #[must_use]
    pub const fn mode(&self) -> Option<FulfillmentMode> {
        self.preference.mode
    }

    #[must_use]
    pub const fn selected_address(&self) -> Option<&Address> {
        self.preference.selected_address.as_ref()
    }

    #[must_use]
    pub const fn selected_branch(&self) -> Option<&Branch> {
        self.preference.selected_branch.as_ref()
    }

    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    #[must_use]
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    // =========================================================================
    // Remote refresh
    // =========================================================================

    /// Fetch the canonical state from the remote profile and address book,
    /// overwriting local state field-by-field on success.
    ///
    /// The profile's preference only wins when its version is at least the
    /// local one; an older remote snapshot loses to unsynced local edits.
    /// On failure the hydrated local state stays authoritative for the
    /// session - no retry loop.
    pub async fn refresh(&mut self) {
        match self.api.get_profile().await {
            Ok(profile) => self.apply_profile(profile),
            Err(e) => warn!(error = %e, "profile refresh failed, keeping local state"),
        }

        match self.api.list_addresses().await {
            Ok(addresses) => self.set_addresses(addresses),
            Err(e) => warn!(error = %e, "address refresh failed, keeping local list"),
        }
    }

    /// Apply a remote profile snapshot. Only a snapshot whose version is at
    /// least the local one may overwrite; an older snapshot loses to
    /// unsynced local edits. The adopted version is persisted even when the
    /// snapshot carries no mode, so the decision survives a restart.
    fn apply_profile(&mut self, profile: Profile) {
        if profile.preference_version < self.preference.version {
            debug!(
                local = self.preference.version,
                remote = profile.preference_version,
                "remote preference older than local, keeping local"
            );
            return;
        }

        self.preference.version = profile.preference_version;
        if let Some(mode) = profile.delivery_type {
            self.preference.mode = Some(mode);
        }
        if let Some(branch_id) = profile.pickup_branch_id
            && let Some(branch) = self.branches.iter().find(|b| b.id == branch_id).cloned()
        {
            self.preference.selected_branch = Some(branch);
            self.persist_selection();
        }
        self.persist_preference();
    }

    // =========================================================================
    // Preference mutations
    // =========================================================================

    /// Set the fulfillment mode. Persists locally at once, then schedules a
    /// best-effort remote profile update; the mode change is effective
    /// before remote confirmation and is never reverted on remote failure.
    ///
    /// Must run inside a tokio runtime (the remote sync is spawned).
    pub fn set_delivery_type(&mut self, mode: FulfillmentMode) {
        self.preference.mode = Some(mode);
        self.preference.version += 1;
        self.persist_preference();
        self.spawn_profile_sync();
    }

    /// Select a delivery address (or clear the selection).
    pub fn set_selected_address(&mut self, address: Option<Address>) {
        self.preference.selected_address = address;
        self.persist_selection();
    }

    /// Select a pickup branch (or clear it). The branch selection is
    /// mirrored to the remote profile the same way as the mode.
    ///
    /// Must run inside a tokio runtime (the remote sync is spawned).
    pub fn set_selected_branch(&mut self, branch: Option<Branch>) {
        self.preference.selected_branch = branch;
        self.preference.version += 1;
        self.persist_selection();
        self.persist_preference();
        self.spawn_profile_sync();
    }

    /// Replace the known branch list.
    pub fn set_branches(&mut self, branches: Vec<Branch>) {
        self.branches = branches;
        self.persist_key(keys::USER_BRANCHES, &self.branches);
    }

    /// Replace the address list, keeping the selection when it survives and
    /// falling back to the default address otherwise.
    pub fn set_addresses(&mut self, addresses: Vec<Address>) {
        self.addresses = addresses;

        let selected_still_known = self
            .preference
            .selected_address
            .as_ref()
            .is_some_and(|sel| self.addresses.iter().any(|a| a.id == sel.id));
        if !selected_still_known {
            self.preference.selected_address =
                self.addresses.iter().find(|a| a.is_default).cloned();
        }

        self.persist_addresses();
    }

    // =========================================================================
    // Address book (local)
    // =========================================================================

    /// Append an address. The first address ever added becomes both the
    /// default and the current selection.
    pub fn add_address(&mut self, mut address: Address) {
        if self.addresses.is_empty() {
            address.is_default = true;
            self.preference.selected_address = Some(address.clone());
        }
        self.addresses.push(address);
        self.persist_addresses();
    }

    /// Update an address in place by id, refreshing the selection if it
    /// pointed at the updated address. Unknown ids are a silent no-op.
    pub fn update_address(&mut self, updated: Address) {
        let Some(slot) = self.addresses.iter_mut().find(|a| a.id == updated.id) else {
            return;
        };
        *slot = updated.clone();

        if self
            .preference
            .selected_address
            .as_ref()
            .is_some_and(|sel| sel.id == updated.id)
        {
            self.preference.selected_address = Some(updated);
        }
        self.persist_addresses();
    }

    /// Remove an address by id, clearing the selection if it pointed there.
    pub fn remove_address(&mut self, id: &AddressId) {
        let before = self.addresses.len();
        self.addresses.retain(|a| &a.id != id);
        if self.addresses.len() == before {
            return;
        }

        if self
            .preference
            .selected_address
            .as_ref()
            .is_some_and(|sel| &sel.id == id)
        {
            self.preference.selected_address = None;
        }
        self.persist_addresses();
    }

    /// Mark exactly one address as the default and select it. The
    /// uniqueness holds in the local copy; the server is not consulted.
    pub fn set_default_address(&mut self, id: &AddressId) {
        for address in &mut self.addresses {
            address.is_default = &address.id == id;
        }
        if let Some(default) = self.addresses.iter().find(|a| &a.id == id).cloned() {
            self.preference.selected_address = Some(default);
        }
        self.persist_addresses();
    }

    // =========================================================================
    // Address book (remote + local)
    // =========================================================================

    /// Create an address on the backend, then record it locally with the
    /// server-assigned id. Local state is only touched on remote success,
    /// so the two copies cannot diverge through this path.
    ///
    /// # Errors
    ///
    /// Propagates the backend failure; local state is untouched.
    pub async fn create_address(&mut self, payload: NewAddress) -> Result<Address, ApiError> {
        let created = self.api.create_address(&payload).await?;
        self.add_address(created.clone());
        Ok(created)
    }

    /// Push an address update to the backend, then apply it locally.
    ///
    /// # Errors
    ///
    /// Propagates the backend failure; local state is untouched.
    pub async fn save_address(&mut self, address: Address) -> Result<Address, ApiError> {
        let saved = self.api.update_address(&address).await?;
        self.update_address(saved.clone());
        Ok(saved)
    }

    /// Delete an address on the backend, then drop it locally.
    ///
    /// # Errors
    ///
    /// Propagates the backend failure; local state is untouched.
    pub async fn delete_address(&mut self, id: &AddressId) -> Result<(), ApiError> {
        self.api.delete_address(id).await?;
        self.remove_address(id);
        Ok(())
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn spawn_profile_sync(&self) {
        let api = self.api.clone();
        let update = ProfileUpdate {
            delivery_type: self.preference.mode,
            pickup_branch_id: self
                .preference
                .selected_branch
                .as_ref()
                .map(|b| b.id.clone()),
            preference_version: self.preference.version,
        };
        tokio::spawn(async move {
            if let Err(e) = api.update_profile(&update).await {
                warn!(error = %e, "fire-and-forget profile sync failed");
            }
        });
    }

    fn persist_preference(&self) {
        if let Some(mode) = self.preference.mode {
            self.persist_key(keys::DELIVERY_TYPE, &mode.to_string());
        }
        self.persist_key(keys::PREFERENCE_VERSION, &self.preference.version);
    }

    fn persist_selection(&self) {
        match &self.preference.selected_address {
            Some(address) => self.persist_key(keys::SELECTED_ADDRESS, address),
            None => self.remove_key(keys::SELECTED_ADDRESS),
        }
        match &self.preference.selected_branch {
            Some(branch) => self.persist_key(keys::SELECTED_BRANCH, branch),
            None => self.remove_key(keys::SELECTED_BRANCH),
        }
    }

    fn persist_addresses(&self) {
        self.persist_key(keys::USER_ADDRESSES, &self.addresses);
        self.persist_selection();
    }

    fn persist_key<T: serde::Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.store.set(key, value) {
            warn!(key, error = %e, "failed to persist preference snapshot");
        }
    }

    fn remove_key(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!(key, error = %e, "failed to clear preference snapshot");
        }
    }
}

fn hydrate_key<T: serde::de::DeserializeOwned>(store: &LocalStore, key: &str) -> Option<T> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "failed to hydrate preference key, using default");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{CheckoutPolicy, StorefrontConfig};
    use samovar_core::{BranchId, UserId};

    fn api() -> ApiClient {
        ApiClient::new(&StorefrontConfig {
            api_base_url: "http://127.0.0.1:9/api/v1".parse().unwrap(),
            data_dir: std::path::PathBuf::from(".samovar"),
            telegram_init_data: None,
            checkout: CheckoutPolicy::default(),
        })
    }

    fn address(id: &str, is_default: bool) -> Address {
        Address {
            id: AddressId::new(id),
            street: "Невский".to_owned(),
            building: "5".to_owned(),
            apartment: None,
            entrance: None,
            floor: None,
            intercom: None,
            comment: None,
            label: None,
            is_default,
        }
    }

    fn branch(id: &str) -> Branch {
        Branch {
            id: BranchId::new(id),
            restaurant_id: samovar_core::RestaurantId::new("rest_1"),
            name: "Центр".to_owned(),
            address: "Невский 5".to_owned(),
            phone: None,
            work_time: "10:00-22:00".to_owned(),
        }
    }

    fn profile(version: u64, mode: Option<FulfillmentMode>, branch: Option<&str>) -> Profile {
        Profile {
            id: UserId::new("user_1"),
            first_name: "Анна".to_owned(),
            last_name: None,
            phone: None,
            bonus_balance: 0,
            delivery_type: mode,
            pickup_branch_id: branch.map(BranchId::new),
            preference_version: version,
        }
    }

    fn open_store() -> (tempfile::TempDir, DeliveryStore) {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalStore::open(dir.path()).unwrap();
        (dir, DeliveryStore::open(local, api()))
    }

    #[tokio::test]
    async fn test_set_delivery_type_is_effective_immediately() {
        let (_dir, mut store) = open_store();
        assert_eq!(store.mode(), None);

        store.set_delivery_type(FulfillmentMode::Delivery);
        assert_eq!(store.mode(), Some(FulfillmentMode::Delivery));
        assert_eq!(store.preference().version, 1);
    }

    #[test]
    fn test_first_address_becomes_default_and_selected() {
        let (_dir, mut store) = open_store();
        store.add_address(address("addr_1", false));

        assert!(store.addresses()[0].is_default);
        assert_eq!(
            store.selected_address().map(|a| a.id.clone()),
            Some(AddressId::new("addr_1"))
        );

        // A second address is neither default nor selected.
        store.add_address(address("addr_2", false));
        assert!(!store.addresses()[1].is_default);
        assert_eq!(
            store.selected_address().map(|a| a.id.clone()),
            Some(AddressId::new("addr_1"))
        );
    }

    #[test]
    fn test_set_default_address_is_exclusive() {
        let (_dir, mut store) = open_store();
        store.add_address(address("addr_1", false));
        store.add_address(address("addr_2", false));
        store.add_address(address("addr_3", false));

        store.set_default_address(&AddressId::new("addr_2"));

        let defaults: Vec<_> = store.addresses().iter().filter(|a| a.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, AddressId::new("addr_2"));
        assert_eq!(
            store.selected_address().map(|a| a.id.clone()),
            Some(AddressId::new("addr_2"))
        );
    }

    #[test]
    fn test_remove_selected_address_clears_selection() {
        let (_dir, mut store) = open_store();
        store.add_address(address("addr_1", false));
        store.remove_address(&AddressId::new("addr_1"));

        assert!(store.addresses().is_empty());
        assert_eq!(store.selected_address(), None);
    }

    #[test]
    fn test_update_address_refreshes_selection() {
        let (_dir, mut store) = open_store();
        store.add_address(address("addr_1", false));

        let mut updated = address("addr_1", true);
        updated.street = "Литейный".to_owned();
        store.update_address(updated);

        assert_eq!(store.selected_address().unwrap().street, "Литейный");
    }

    #[tokio::test]
    async fn test_preferences_hydrate_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let local = LocalStore::open(dir.path()).unwrap();
            let mut store = DeliveryStore::open(local, api());
            store.set_delivery_type(FulfillmentMode::Pickup);
            store.add_address(address("addr_1", false));
        }

        let local = LocalStore::open(dir.path()).unwrap();
        let store = DeliveryStore::open(local, api());
        assert_eq!(store.mode(), Some(FulfillmentMode::Pickup));
        assert_eq!(store.preference().version, 1);
        assert_eq!(store.addresses().len(), 1);
        assert!(store.addresses()[0].is_default);
    }

    #[test]
    fn test_set_addresses_falls_back_to_default_selection() {
        let (_dir, mut store) = open_store();
        store.add_address(address("addr_1", false));

        // Remote refresh replaces the list; the old selection is gone.
        store.set_addresses(vec![address("addr_7", false), address("addr_8", true)]);
        assert_eq!(
            store.selected_address().map(|a| a.id.clone()),
            Some(AddressId::new("addr_8"))
        );
    }

    #[test]
    fn test_newer_remote_profile_overwrites_local_preference() {
        let (_dir, mut store) = open_store();
        store.set_branches(vec![branch("branch_1")]);

        store.apply_profile(profile(5, Some(FulfillmentMode::Pickup), Some("branch_1")));

        assert_eq!(store.mode(), Some(FulfillmentMode::Pickup));
        assert_eq!(store.preference().version, 5);
        assert_eq!(
            store.selected_branch().map(|b| b.id.clone()),
            Some(BranchId::new("branch_1"))
        );
    }

    #[tokio::test]
    async fn test_older_remote_profile_loses_to_local_edits() {
        let (_dir, mut store) = open_store();
        store.set_delivery_type(FulfillmentMode::Delivery);
        assert_eq!(store.preference().version, 1);

        store.apply_profile(profile(0, Some(FulfillmentMode::Pickup), None));

        assert_eq!(store.mode(), Some(FulfillmentMode::Delivery));
        assert_eq!(store.preference().version, 1);
    }

    #[test]
    fn test_equal_version_remote_profile_is_applied() {
        let (_dir, mut store) = open_store();
        assert_eq!(store.preference().version, 0);

        store.apply_profile(profile(0, Some(FulfillmentMode::Delivery), None));
        assert_eq!(store.mode(), Some(FulfillmentMode::Delivery));
    }

    #[test]
    fn test_adopted_version_persists_without_a_mode() {
        let dir = tempfile::tempdir().unwrap();
        {
            let local = LocalStore::open(dir.path()).unwrap();
            let mut store = DeliveryStore::open(local, api());
            // A bare snapshot: higher version, nothing else set.
            store.apply_profile(profile(7, None, None));
            assert_eq!(store.preference().version, 7);
        }

        // The version survives a restart, so a later refresh still sees the
        // remote snapshot as already applied.
        let local = LocalStore::open(dir.path()).unwrap();
        let store = DeliveryStore::open(local, api());
        assert_eq!(store.preference().version, 7);
    }
}
