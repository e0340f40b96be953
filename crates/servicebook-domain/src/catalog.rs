//! Fixed service-type catalogs
//!
//! The registration form offers these exact checklists; records created
//! through it carry one entry per catalog row, in catalog order.

use servicebook_types::ServiceItem;

/// Engine service checklist, in form order
pub const ENGINE_SERVICE_TYPES: [&str; 15] = [
    "Oil change",
    "Oil filter change",
    "Air filter change",
    "AC filter change",
    "Oil seal replacement",
    "Belt replacement",
    "Water pump replacement",
    "Thermostat replacement",
    "Coolant hose replacement",
    "Drive pulley replacement",
    "Engine mount replacement",
    "Spark plug replacement",
    "Fuel injector repair",
    "Fuel injector replacement",
    "Throttle body repair",
];

/// Chassis service checklist, in form order
pub const CHASSIS_SERVICE_TYPES: [&str; 8] = [
    "Shock absorber replacement",
    "Lower arm replacement",
    "Rack end replacement",
    "Ball joint replacement",
    "Front brake repair",
    "Front brake replacement",
    "Rear brake repair",
    "Rear brake replacement",
];

/// Fresh engine checklist with no flags set
pub fn engine_defaults() -> Vec<ServiceItem> {
    ENGINE_SERVICE_TYPES.iter().copied().map(ServiceItem::new).collect()
}

/// Fresh chassis checklist with no flags set
pub fn chassis_defaults() -> Vec<ServiceItem> {
    CHASSIS_SERVICE_TYPES.iter().copied().map(ServiceItem::new).collect()
}

/// The single default scanning entry
pub fn scanning_default() -> Vec<ServiceItem> {
    vec![ServiceItem::blank()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_defaults_match_catalog_order() {
        let engine = engine_defaults();
        assert_eq!(engine.len(), ENGINE_SERVICE_TYPES.len());
        for (item, expected) in engine.iter().zip(ENGINE_SERVICE_TYPES) {
            assert_eq!(item.service_type, expected);
            assert!(!item.has_active_flag());
        }
        let chassis = chassis_defaults();
        assert_eq!(chassis.len(), CHASSIS_SERVICE_TYPES.len());
        assert_eq!(chassis[0].service_type, "Shock absorber replacement");
    }

    #[test]
    fn test_scanning_default_is_single_blank_entry() {
        let scanning = scanning_default();
        assert_eq!(scanning.len(), 1);
        assert_eq!(scanning[0], ServiceItem::blank());
    }
}
