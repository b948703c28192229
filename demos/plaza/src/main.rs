//! plaza — one teleport gate, two worlds, and a player who travels heavy.
//!
//! Steve rides a horse with two wolves on leads and a random-length goat
//! train tied to the horse.  He walks into the plaza and asks for the `gate`
//! anchor, which sits on a ledge over a lava moat in the nether.  Alex asks
//! for the same gate but wanders off before the warm-up ends.  A herd of
//! loose cows mills around and must stay behind.
//!
//! History goes to `plaza_output/history.csv` through the background worker;
//! rerunning the demo appends to it.

use std::path::Path;

use anyhow::{Result, anyhow};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wg_core::{
    AccountId, Anchor, BlockPos, EntityId, Facing, Location, Position, TeleportConfig,
    Visibility, WorldId,
};
use wg_history::{BackgroundHistory, CsvHistory, HistoryAnswer, HistoryQuery, MemoryHistory, read_csv};
use wg_teleport::{
    CancelReason, Feedback, MemoryAnchors, MemoryBank, OrchestratorBuilder, ResourceBank,
    TeleportError, TeleportState,
};
use wg_world::{BlockKind, EntityKind, VoxelWorld, WorldState};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:            u64   = 7;
const START_UNIX_SECS: i64   = 1_700_000_000;
const COW_COUNT:       usize = 12;
const MAX_TICKS:       u64   = 400;

const OVERWORLD: WorldId   = WorldId(0);
const NETHER:    WorldId   = WorldId(1);
const STEVE:     AccountId = AccountId(1);
const ALEX:      AccountId = AccountId(2);
const PEARL:     &str      = "ender_pearl";

const CONFIG_JSON: &str = r#"{
    "delay_secs": 3,
    "cooldown_secs": 10,
    "max_leash_depth": 4,
    "use_cost": { "item": "ender_pearl", "amount": 1 },
    "world_display_names": { "world": "the Plaza" }
}"#;

// ── Feedback ──────────────────────────────────────────────────────────────────

/// Stands in for chat messages.
struct LogFeedback;

impl Feedback for LogFeedback {
    fn on_scheduled(&mut self, subject: EntityId, anchor: &str, delay_secs: u64) {
        info!(%subject, anchor, "teleporting in {delay_secs}s, don't move");
    }

    fn on_completed(&mut self, subject: EntityId, anchor: &str, landing: Location) {
        info!(%subject, anchor, %landing, "whoosh");
    }

    fn on_cancelled(&mut self, subject: EntityId, reason: CancelReason) {
        info!(%subject, %reason, "teleport cancelled");
    }

    fn on_rejected(&mut self, subject: EntityId, error: &TeleportError) {
        info!(%subject, %error, "teleport refused");
    }

    fn on_leash_depth_warning(&mut self, subject: EntityId, max_depth: u32, total: usize) {
        warn!(%subject, max_depth, total, "leash chain too long, the tail stays behind");
    }

    fn on_leash_restore_failed(&mut self, holder: EntityId, follower: EntityId) {
        warn!(%holder, %follower, "a lead could not be re-tied");
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

fn loc(world: WorldId, x: f64, z: f64) -> Location {
    Location::new(world, Position::new(x, 64.0, z))
}

/// A stone plaza in the overworld, and in the nether a stone floor with a
/// lava moat around the gate's marker.  The marker is a wall sign facing
/// east, so arrivals are nudged that way.
fn build_worlds() -> Result<WorldState> {
    let mut plaza = VoxelWorld::new(OVERWORLD, "world", -64, 320);
    plaza.fill(BlockPos::new(-24, 63, -24), BlockPos::new(24, 63, 24), BlockKind::Solid)?;

    let mut nether = VoxelWorld::new(NETHER, "world_nether", 0, 128);
    nether.fill(BlockPos::new(-24, 63, -24), BlockPos::new(24, 63, 24), BlockKind::Solid)?;
    nether.fill(BlockPos::new(-1, 63, -1), BlockPos::new(1, 63, 1), BlockKind::Lava)?;
    nether.set_block(BlockPos::new(0, 64, 0), BlockKind::WallSign(Facing::East))?;

    let mut state = WorldState::new();
    state.add_world(plaza);
    state.add_world(nether);
    Ok(state)
}

struct Cast {
    steve:  EntityId,
    alex:   EntityId,
    horse:  EntityId,
    wolves: Vec<EntityId>,
    goats:  Vec<EntityId>,
    cows:   Vec<EntityId>,
}

fn populate(world: &mut WorldState, rng: &mut SmallRng) -> Result<Cast> {
    let steve = world.spawn_player("steve", STEVE, loc(OVERWORLD, 0.5, 0.5))?;
    let horse = world.spawn(EntityKind::Mount, "horse", loc(OVERWORLD, 0.5, 0.5))?;
    world.mount(steve, horse)?;

    let mut wolves = Vec::new();
    for x in [2.5, -1.5] {
        let wolf = world.spawn(EntityKind::Creature, "wolf", loc(OVERWORLD, x, 0.5))?;
        world.leash(wolf, steve)?;
        wolves.push(wolf);
    }

    let mut goats = Vec::new();
    let mut holder = horse;
    for i in 0..rng.gen_range(2..=6) {
        let goat = world.spawn(EntityKind::Creature, "goat", loc(OVERWORLD, 0.5, -1.5 - i as f64))?;
        world.leash(goat, holder)?;
        goats.push(goat);
        holder = goat;
    }

    let mut cows = Vec::with_capacity(COW_COUNT);
    for _ in 0..COW_COUNT {
        let (x, z) = (rng.gen_range(-12.0..12.0), rng.gen_range(-12.0..12.0));
        cows.push(world.spawn(EntityKind::Creature, "cow", loc(OVERWORLD, x, z))?);
    }

    let alex = world.spawn_player("alex", ALEX, loc(OVERWORLD, 6.5, 6.5))?;
    Ok(Cast { steve, alex, horse, wolves, goats, cows })
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = TeleportConfig::from_json_str(CONFIG_JSON)?;
    let mut rng = SmallRng::seed_from_u64(SEED);

    // 1. Worlds and cast.
    let mut world = build_worlds()?;
    let cast = populate(&mut world, &mut rng)?;
    info!(goats = cast.goats.len(), cows = cast.cows.len(), "plaza populated");

    // 2. Collaborators.
    let anchors = MemoryAnchors::new();
    anchors.insert(Anchor::new("gate", loc(NETHER, 0.5, 0.5), ALEX));
    anchors.insert(
        Anchor::new("garden", loc(OVERWORLD, 16.5, -16.5), STEVE).with_visibility(Visibility::Private),
    );
    let bank = MemoryBank::new();
    bank.deposit(cast.steve, PEARL, 4);
    bank.deposit(cast.alex, PEARL, 1);

    let out_dir = Path::new("plaza_output");
    std::fs::create_dir_all(out_dir)?;
    let csv_path = out_dir.join("history.csv");
    let seed = if csv_path.exists() { read_csv(&csv_path)? } else { Vec::new() };
    let history = BackgroundHistory::spawn(CsvHistory::open(&csv_path)?, MemoryHistory::from_rows(seed))?;
    let lookup = history.lookup();

    let mut orch = OrchestratorBuilder::new(config, world)
        .anchors(anchors)
        .bank(bank.clone())
        .feedback(LogFeedback)
        .history(history)
        .start_unix_secs(START_UNIX_SECS)
        .build()?;

    // 3. Steve asks from another thread; Alex asks directly.
    let handle = orch.handle();
    let steve = cast.steve;
    std::thread::spawn(move || handle.request(steve, "gate"))
        .join()
        .map_err(|_| anyhow!("request thread panicked"))?;
    orch.request(cast.alex, "gate")?;

    // 4. Tick until Steve lands; Alex leaves the voxel partway through.
    let mut ticks = 0;
    while orch.state(cast.steve) != TeleportState::Expired && ticks < MAX_TICKS {
        if ticks == 20 {
            orch.world.walk(cast.alex, Position::new(8.5, 64.0, 6.5))?;
        }
        orch.tick();
        ticks += 1;
    }
    if orch.state(cast.steve) != TeleportState::Expired {
        return Err(anyhow!("steve never arrived after {MAX_TICKS} ticks"));
    }
    // Let the horse remount and the leads re-tie.
    orch.run_ticks(10);

    // 5. A second jump right away is refused.
    if let Err(e) = orch.request(cast.steve, "garden") {
        info!(error = %e, "second request refused as expected");
    }

    // 6. Report.
    let w = &orch.world;
    let landing = w.entity(cast.steve).map(|e| e.location);
    let riding = w.entity(cast.steve).and_then(|e| e.vehicle) == Some(cast.horse);
    let wolves_tied = cast
        .wolves
        .iter()
        .filter(|&&id| w.entity(id).is_some_and(|e| e.leash_holder == Some(cast.steve)))
        .count();
    let in_nether = |ids: &[EntityId]| {
        ids.iter()
            .filter(|&&id| w.entity(id).is_some_and(|e| e.location.world == NETHER))
            .count()
    };

    let popular: Vec<serde_json::Value> = match lookup.query(HistoryQuery::PopularAnchors(3))? {
        HistoryAnswer::Popular(ranked) => ranked
            .into_iter()
            .map(|a| serde_json::json!({ "anchor": a.anchor, "uses": a.uses }))
            .collect(),
        _ => Vec::new(),
    };
    let cross_world = match lookup.query(HistoryQuery::CrossWorldCount)? {
        HistoryAnswer::Count(n) => n,
        _ => 0,
    };

    let summary = serde_json::json!({
        "ticks": orch.clock.current_tick.0,
        "steve": {
            "landing": landing.map(|l| l.to_string()),
            "riding_horse": riding,
            "wolves_leashed": wolves_tied,
            "goats_in_nether": in_nether(&cast.goats),
            "pearls_left": bank.balance(cast.steve, PEARL),
            "cooldown_secs": orch.cooldown_remaining_secs(cast.steve),
        },
        "alex": {
            "state": format!("{:?}", orch.state(cast.alex)),
            "pearls_left": bank.balance(cast.alex, PEARL),
        },
        "cows_in_nether": in_nether(&cast.cows),
        "history": { "popular": popular, "cross_world": cross_world },
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
