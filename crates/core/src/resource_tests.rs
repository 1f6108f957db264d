use super::*;

#[test]
fn tie_break_order_is_wall_cpu_memory_threads() {
    // The enforcer relies on ResourceLimitType's Ord to pick the highest
    // priority violation when several fire in the same sample.
    let mut kinds = vec![
        ResourceLimitType::Threads,
        ResourceLimitType::Memory,
        ResourceLimitType::Wall,
        ResourceLimitType::Cpu,
    ];
    kinds.sort();
    assert_eq!(
        kinds,
        vec![
            ResourceLimitType::Wall,
            ResourceLimitType::Cpu,
            ResourceLimitType::Memory,
            ResourceLimitType::Threads,
        ]
    );
}

#[test]
fn usage_has_violation_reflects_violations_set() {
    let mut usage = ResourceUsage::default();
    assert!(!usage.has_violation());
    usage.violations.insert(ResourceLimitType::Wall);
    assert!(usage.has_violation());
}

#[test]
fn unbounded_limits_have_no_fields_set() {
    let limits = ResourceLimits::unbounded();
    assert_eq!(limits.max_memory_mb, None);
    assert_eq!(limits.max_cpu_ms, None);
    assert_eq!(limits.max_wall_ms, None);
    assert_eq!(limits.max_threads, None);
}
