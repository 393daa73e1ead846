//! Fixed venue and supplier catalogs.
//!
//! The catalogs bound every key family a submission may use and fix the
//! order in which venue lines and supplier tokens appear in a contract.

use serde::Serialize;

/// A bookable venue area of the resort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VenueCatalogEntry {
    pub name: &'static str,
}

/// An outside supplier add-on with its corkage fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SupplierCatalogEntry {
    pub id: &'static str,
    pub label: &'static str,
    /// 預設費用 (Php)
    pub default_fee: u32,
    /// 模板 token 前綴，例如 CATERING -> {{CATERING_CHECKED}}
    pub token_prefix: &'static str,
}

pub static VENUES: [VenueCatalogEntry; 7] = [
    VenueCatalogEntry { name: "Swimming Pool" },
    VenueCatalogEntry { name: "Room 1" },
    VenueCatalogEntry { name: "Room 2" },
    VenueCatalogEntry { name: "Kitchen lounge" },
    VenueCatalogEntry { name: "Family room" },
    VenueCatalogEntry { name: "Function Hall" },
    VenueCatalogEntry { name: "Others" },
];

pub static SUPPLIERS: [SupplierCatalogEntry; 8] = [
    SupplierCatalogEntry {
        id: "catering_services",
        label: "CATERING SERVICES",
        default_fee: 3000,
        token_prefix: "CATERING",
    },
    SupplierCatalogEntry {
        id: "sounds_lights",
        label: "SOUNDS & LIGHTS",
        default_fee: 1500,
        token_prefix: "SOUNDS_LIGHTS",
    },
    SupplierCatalogEntry {
        id: "photobooth",
        label: "PHOTOBOOTH",
        default_fee: 1000,
        token_prefix: "PHOTOBOOTH",
    },
    SupplierCatalogEntry {
        id: "projector",
        label: "PROJECTOR",
        default_fee: 1000,
        token_prefix: "PROJECTOR",
    },
    SupplierCatalogEntry {
        id: "mobile_bar",
        label: "MOBILE BAR",
        default_fee: 2000,
        token_prefix: "MOBILE_BAR",
    },
    SupplierCatalogEntry {
        id: "food_cart",
        label: "FOOD CART",
        default_fee: 500,
        token_prefix: "FOOD_CART",
    },
    SupplierCatalogEntry {
        id: "band",
        label: "BAND",
        default_fee: 1500,
        token_prefix: "BAND",
    },
    SupplierCatalogEntry {
        id: "photo_video",
        label: "PHOTO/VIDEO",
        default_fee: 1000,
        token_prefix: "PHOTO_VIDEO",
    },
];

/// Submission keys belonging to one venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueKeys {
    pub selected: String,
    pub note: String,
    pub amount: String,
}

/// Submission keys belonging to one supplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierKeys {
    pub checked: String,
    pub amount: String,
}

impl VenueCatalogEntry {
    pub fn keys(&self) -> VenueKeys {
        VenueKeys {
            selected: format!("venue_{}", self.name),
            note: format!("note_{}", self.name),
            amount: format!("amount_{}", self.name),
        }
    }

    /// 合約上顯示的名稱 (全大寫)
    pub fn display_label(&self) -> String {
        self.name.to_uppercase()
    }
}

impl SupplierCatalogEntry {
    pub fn keys(&self) -> SupplierKeys {
        SupplierKeys {
            checked: format!("check_{}", self.id),
            amount: self.id.to_string(),
        }
    }

    pub fn checked_token(&self) -> String {
        format!("{}_CHECKED", self.token_prefix)
    }

    pub fn amount_token(&self) -> String {
        format!("{}_AMOUNT", self.token_prefix)
    }

    pub fn fee_token(&self) -> String {
        format!("{}_FEE", self.token_prefix)
    }
}

pub fn find_venue(name: &str) -> Option<&'static VenueCatalogEntry> {
    VENUES.iter().find(|v| v.name == name)
}

pub fn find_supplier(id: &str) -> Option<&'static SupplierCatalogEntry> {
    SUPPLIERS.iter().find(|s| s.id == id)
}

/// Every key a submission may carry, scalar fields included.
pub fn recognized_keys() -> Vec<String> {
    let mut keys: Vec<String> = crate::domain::model::SCALAR_KEYS
        .iter()
        .map(|k| k.to_string())
        .collect();
    for venue in VENUES.iter() {
        let k = venue.keys();
        keys.extend([k.selected, k.note, k.amount]);
    }
    for supplier in SUPPLIERS.iter() {
        let k = supplier.keys();
        keys.extend([k.checked, k.amount]);
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(VENUES.len(), 7);
        assert_eq!(SUPPLIERS.len(), 8);
        assert_eq!(VENUES[6].name, "Others");
    }

    #[test]
    fn test_catalog_entries_are_unique() {
        let venue_names: HashSet<_> = VENUES.iter().map(|v| v.name).collect();
        let supplier_ids: HashSet<_> = SUPPLIERS.iter().map(|s| s.id).collect();
        let prefixes: HashSet<_> = SUPPLIERS.iter().map(|s| s.token_prefix).collect();
        assert_eq!(venue_names.len(), VENUES.len());
        assert_eq!(supplier_ids.len(), SUPPLIERS.len());
        assert_eq!(prefixes.len(), SUPPLIERS.len());
    }

    #[test]
    fn test_key_families() {
        let pool = find_venue("Swimming Pool").unwrap();
        assert_eq!(pool.keys().selected, "venue_Swimming Pool");
        assert_eq!(pool.keys().note, "note_Swimming Pool");
        assert_eq!(pool.keys().amount, "amount_Swimming Pool");
        assert_eq!(pool.display_label(), "SWIMMING POOL");

        let catering = find_supplier("catering_services").unwrap();
        assert_eq!(catering.keys().checked, "check_catering_services");
        assert_eq!(catering.keys().amount, "catering_services");
        assert_eq!(catering.checked_token(), "CATERING_CHECKED");
        assert_eq!(catering.default_fee, 3000);

        assert!(find_venue("Ballroom").is_none());
        assert!(find_supplier("fireworks").is_none());
    }

    #[test]
    fn test_recognized_keys_cover_all_families() {
        let keys = recognized_keys();
        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(keys.len(), unique.len());
        assert!(keys.contains(&"amount_Others".to_string()));
        assert!(keys.contains(&"check_photo_video".to_string()));
        assert!(keys.contains(&"venue_total".to_string()));
    }
}
