//! Unit tests for wg-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AccountId, EntityId, WorldId};

    #[test]
    fn index_roundtrip() {
        let id = EntityId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(EntityId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(EntityId::INVALID.0, u32::MAX);
        assert_eq!(WorldId::INVALID.0, u16::MAX);
        assert_eq!(AccountId::default(), AccountId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(EntityId(7).to_string(), "EntityId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{BlockPos, Facing, Forward, Location, Position, WorldId};

    #[test]
    fn block_floors_negative_coordinates() {
        let p = Position::new(-0.5, 64.0, 3.99);
        assert_eq!(p.block(), BlockPos::new(-1, 64, 3));
    }

    #[test]
    fn far_coordinates_clamp_instead_of_overflowing() {
        let edge = Position::new(1.0e10, 10.0, -1.0e10).block();
        assert_eq!(edge, BlockPos::new(i32::MAX, 10, i32::MIN));
        assert_eq!(edge.offset(2, 0, -2), edge);
        assert_eq!(edge.offset(-1, 1, 1), BlockPos::new(i32::MAX - 1, 11, i32::MIN + 1));
    }

    #[test]
    fn standing_point_is_voxel_centre() {
        let p = BlockPos::new(2, 70, -3).standing_point();
        assert_eq!(p, Position::new(2.5, 70.0, -2.5));
        assert_eq!(p.block(), BlockPos::new(2, 70, -3));
    }

    #[test]
    fn distance_across_worlds_is_none() {
        let a = Location::new(WorldId(0), Position::new(0.0, 0.0, 0.0));
        let b = Location::new(WorldId(1), Position::new(0.0, 0.0, 0.0));
        assert_eq!(a.distance(b), None);
        let c = Location::new(WorldId(0), Position::new(3.0, 4.0, 0.0));
        assert_eq!(a.distance(c), Some(5.0));
    }

    #[test]
    fn forward_rejects_zero_vector() {
        assert!(Forward::new(0.0, 0.0).is_none());
        let f = Forward::new(3.0, 4.0).unwrap();
        assert!((f.x() - 0.6).abs() < 1e-12);
        assert!((f.z() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn facing_vectors_and_deltas_agree() {
        for face in [Facing::North, Facing::East, Facing::South, Facing::West] {
            let f = face.forward();
            assert_eq!(Facing::from_delta(f.x(), f.z()), face);
            assert_eq!(face.opposite().opposite(), face);
        }
    }
}

#[cfg(test)]
mod time {
    use crate::{GameClock, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(3).since(Tick(10)), 0);
    }

    #[test]
    fn clock_conversions() {
        let mut clock = GameClock::new(1_000, 20);
        assert_eq!(clock.ticks_for_secs(5), 100);
        assert_eq!(clock.secs_for_ticks(21), 2);
        assert_eq!(clock.secs_for_ticks(20), 1);
        for _ in 0..40 {
            clock.advance();
        }
        assert_eq!(clock.current_unix_secs(), 1_002);
    }
}

#[cfg(test)]
mod anchor {
    use crate::{AccountId, Anchor, Location, Position, Visibility, WarpLike, WorldId};

    fn anchor() -> Anchor {
        Anchor::new("spawn", Location::new(WorldId(0), Position::default()), AccountId(1))
    }

    #[test]
    fn public_anchor_usable_by_anyone() {
        let a = anchor();
        assert!(!a.is_private());
        assert!(a.can_use(AccountId(99)));
    }

    #[test]
    fn private_anchor_owner_and_invitees_only() {
        let mut a = anchor().with_visibility(Visibility::Private);
        assert!(a.can_use(AccountId(1)));
        assert!(!a.can_use(AccountId(2)));
        a.invite(AccountId(2));
        a.invite(AccountId(2));
        assert_eq!(a.invited.len(), 1);
        assert!(a.can_use(AccountId(2)));
        a.uninvite(AccountId(2));
        assert!(!a.can_use(AccountId(2)));
        assert_eq!(a.creator_id(), AccountId(1));
    }
}

#[cfg(test)]
mod config {
    use crate::{CoreError, CrossWorldPolicy, ResourceCost, TeleportConfig, world_display_name};

    #[test]
    fn empty_document_gives_defaults() {
        let config = TeleportConfig::from_json_str("{}").unwrap();
        assert_eq!(config, TeleportConfig::default());
        assert_eq!(config.delay_secs, 5);
        assert_eq!(config.max_leash_depth, 5);
        assert!(config.use_cost.is_free());
    }

    #[test]
    fn partial_document_overrides() {
        let config = TeleportConfig::from_json_str(
            r#"{ "delay_secs": 3, "use_cost": { "item": "ender_pearl", "amount": 2 },
                 "cross_world": { "enabled": false } }"#,
        )
        .unwrap();
        assert_eq!(config.delay_secs, 3);
        assert_eq!(config.use_cost, ResourceCost::of("ender_pearl", 2));
        assert!(!config.cross_world.enabled);
        assert!(config.cross_world.privileged_bypass);
    }

    #[test]
    fn zero_leash_depth_rejected() {
        let err = TeleportConfig::from_json_str(r#"{ "max_leash_depth": 0 }"#).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = TeleportConfig::from_json_str("{ delay_secs: }").unwrap_err();
        assert!(matches!(err, CoreError::Parse(_)));
    }

    #[test]
    fn cross_world_policy_matrix() {
        let open = CrossWorldPolicy { enabled: true, privileged_bypass: false };
        let closed = CrossWorldPolicy { enabled: false, privileged_bypass: true };
        let sealed = CrossWorldPolicy { enabled: false, privileged_bypass: false };
        assert!(open.allows(false, false));
        assert!(closed.allows(true, false));
        assert!(!closed.allows(false, false));
        assert!(closed.allows(false, true));
        assert!(!sealed.allows(false, true));
    }

    #[test]
    fn display_names() {
        let mut config = TeleportConfig::default();
        assert_eq!(world_display_name(&config, "world_nether"), "Nether");
        assert_eq!(world_display_name(&config, "skyblock"), "skyblock");
        config.world_display_names.insert("skyblock".into(), "Sky Islands".into());
        assert_eq!(world_display_name(&config, "skyblock"), "Sky Islands");
    }
}
