//! Frontline Headless Map Harness
//!
//! Validates map generation, pathfinding and movement without a renderer.
//! Runs entirely in-process: no window, no timers, no disk writes.
//!
//! Usage:
//!   cargo run -p frontline-simtest
//!   cargo run -p frontline-simtest -- --verbose
//!   cargo run -p frontline-simtest -- --sweep 50
//!   cargo run -p frontline-simtest -- --dump > partition.json
//!
//! Library logging goes to stderr and is filtered with `RUST_LOG`.

use frontline_logic::movement::{self, GroupId, MobileGroup, Transition};
use frontline_logic::partition::{self, MapSettings, Partition};
use frontline_logic::pathfinding::NavGraph;
use frontline_logic::scenario::Scenario;
use frontline_logic::seeds::scatter_seeds;
use frontline_logic::session::Session;
use frontline_logic::validation::{self, Severity};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

// ── Theatre (same JSON the tests use) ───────────────────────────────────
const THEATRE_JSON: &str = include_str!("../../../data/theatre.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let dump = args.iter().any(|a| a == "--dump");
    let sweep = args
        .iter()
        .position(|a| a == "--sweep")
        .and_then(|i| args.get(i + 1))
        .and_then(|n| n.parse::<u64>().ok())
        .unwrap_or(20);

    if dump {
        dump_partition();
        return;
    }

    println!("=== Frontline Map Harness ===\n");

    let mut results = Vec::new();

    // 1. Theatre loading
    let scenario = match load_theatre(&mut results) {
        Some(s) => s,
        None => {
            report(&results, verbose);
            std::process::exit(1);
        }
    };

    // 2. Partition of the theatre
    let partition = partition::generate(&scenario.seeds, &scenario.settings);
    results.extend(validate_theatre_partition(&scenario, &partition, verbose));

    // 3. Pathfinding on synthetic graphs
    results.extend(validate_pathfinding(verbose));

    // 4. Movement scheduler
    results.extend(validate_movement(verbose));

    // 5. Session gating on the theatre
    results.extend(validate_session(&scenario, verbose));

    // 6. Degenerate inputs
    results.extend(validate_degenerate_inputs(verbose));

    // 7. Random seed sweep
    results.extend(validate_random_sweep(sweep, verbose));

    if !report(&results, verbose) {
        std::process::exit(1);
    }
}

fn report(results: &[TestResult], verbose: bool) -> bool {
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );
    failed == 0
}

fn dump_partition() {
    let partition = match Scenario::from_json(THEATRE_JSON) {
        Ok(s) => partition::generate(&s.seeds, &s.settings),
        Err(e) => {
            eprintln!("theatre failed to load: {}", e);
            std::process::exit(1);
        }
    };
    match serde_json::to_string_pretty(&partition) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("partition failed to serialize: {}", e);
            std::process::exit(1);
        }
    }
}

// ── 1. Theatre ──────────────────────────────────────────────────────────

fn load_theatre(results: &mut Vec<TestResult>) -> Option<Scenario> {
    println!("--- Theatre ---");
    match Scenario::from_json(THEATRE_JSON) {
        Ok(s) => {
            results.push(TestResult {
                name: "theatre_load".into(),
                passed: true,
                detail: format!(
                    "'{}': {} seeds, {} groups in {} formations",
                    s.name,
                    s.seeds.len(),
                    s.forces.len(),
                    s.formations.len()
                ),
            });
            Some(s)
        }
        Err(e) => {
            results.push(TestResult {
                name: "theatre_load".into(),
                passed: false,
                detail: e.to_string(),
            });
            None
        }
    }
}

// ── 2. Theatre partition ────────────────────────────────────────────────

fn validate_theatre_partition(
    scenario: &Scenario,
    partition: &Partition,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Theatre Partition ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "partition_ready".into(),
        passed: partition.is_ready(),
        detail: format!("{} regions generated", partition.len()),
    });

    let findings = validation::validate_all(&partition.regions, &scenario.seeds);
    let errors = validation::errors_only(&findings);
    let warnings = findings
        .iter()
        .filter(|f| f.severity == Severity::Warning)
        .count();
    results.push(TestResult {
        name: "partition_valid".into(),
        passed: errors.is_empty(),
        detail: if errors.is_empty() {
            format!("no errors, {} warnings", warnings)
        } else {
            format!("{} errors, first: {}", errors.len(), errors[0].message)
        },
    });
    if verbose {
        for f in &findings {
            println!("    [{}] {:?}: {}", f.category, f.severity, f.message);
        }
    }

    let edges: usize = partition.regions.iter().map(|r| r.neighbors.len()).sum::<usize>() / 2;
    let isolated = partition
        .regions
        .iter()
        .filter(|r| r.neighbors.is_empty())
        .count();
    results.push(TestResult {
        name: "partition_adjacency".into(),
        passed: edges >= partition.len().saturating_sub(1) && isolated == 0,
        detail: format!("{} adjacencies, {} isolated regions", edges, isolated),
    });

    let borders_kept = partition.territory_borders == scenario.settings.territory_borders;
    results.push(TestResult {
        name: "partition_borders_passthrough".into(),
        passed: borders_kept,
        detail: format!("{} territory outlines", partition.territory_borders.len()),
    });

    let override_applied = partition
        .region(121)
        .map(|r| r.owner == "NATO" && r.controller == "NATO")
        .unwrap_or(false);
    results.push(TestResult {
        name: "partition_allegiance_override".into(),
        passed: override_applied,
        detail: "landing zone #121 starts under NATO".into(),
    });

    results
}

// ── 3. Pathfinding ──────────────────────────────────────────────────────

fn ring() -> NavGraph {
    NavGraph::from_adjacency(vec![
        (1, vec![2, 5]),
        (2, vec![1, 3]),
        (3, vec![2, 4]),
        (4, vec![3, 5]),
        (5, vec![4, 1]),
    ])
}

fn validate_pathfinding(_verbose: bool) -> Vec<TestResult> {
    println!("--- Pathfinding ---");
    let mut results = Vec::new();
    let nav = ring();

    results.push(TestResult {
        name: "pathfind_same_region".into(),
        passed: (1..=5).all(|x| nav.next_hop(x, x) == x),
        detail: "next_hop(x, x) == x".into(),
    });

    results.push(TestResult {
        name: "pathfind_ring_first_step".into(),
        passed: nav.next_hop(1, 3) == 2 && nav.next_hop(1, 4) == 5,
        detail: "1→3 via 2, 1→4 via 5".into(),
    });

    let split = NavGraph::from_edges(&[(1, 2), (3, 4)]);
    results.push(TestResult {
        name: "pathfind_unreachable".into(),
        passed: split.next_hop(1, 4) == 1 && split.find_path(1, 4).is_none(),
        detail: "disconnected graph → start".into(),
    });

    // Larger graph stress test
    let chain: Vec<(u32, u32)> = (0..999u32).map(|i| (i, i + 1)).collect();
    let big = NavGraph::from_edges(&chain);
    let long_path = big.find_path(0, 999);
    results.push(TestResult {
        name: "pathfind_1000_regions".into(),
        passed: long_path.as_ref().map(|p| p.len()) == Some(999) && big.next_hop(0, 999) == 1,
        detail: "1000-region chain pathfind succeeds".into(),
    });

    results
}

// ── 4. Movement ─────────────────────────────────────────────────────────

fn validate_movement(verbose: bool) -> Vec<TestResult> {
    println!("--- Movement ---");
    let mut results = Vec::new();
    let nav = ring();
    let id = GroupId::from("g");

    // Ring scenario: 1 → 3 takes two hops, then one tick to clear.
    let mut groups = vec![MobileGroup::new("g", "Blue", "f1", 1)];
    movement::issue_move(&mut groups, &[id.clone()], 3);
    let mut trace = Vec::new();
    for _ in 0..3 {
        let r = movement::tick(&mut groups, &nav);
        trace.push((groups[0].region, groups[0].target, r.transition_of(&id)));
    }
    let expected = [
        (2, Some(3), Some(Transition::Moved { from: 1, to: 2 })),
        (3, Some(3), Some(Transition::Moved { from: 2, to: 3 })),
        (3, None, Some(Transition::Arrived { at: 3 })),
    ];
    if verbose {
        for (i, t) in trace.iter().enumerate() {
            println!("    tick {}: {:?}", i + 1, t);
        }
    }
    results.push(TestResult {
        name: "movement_ring_scenario".into(),
        passed: trace == expected,
        detail: "1→2→3, then order cleared".into(),
    });

    // Blocked: nothing leads to 99.
    let line = NavGraph::from_adjacency(vec![(1, vec![2]), (2, vec![1])]);
    let mut groups = vec![MobileGroup::new("g", "Blue", "f1", 1)];
    movement::issue_move(&mut groups, &[id.clone()], 99);
    let r = movement::tick(&mut groups, &line);
    results.push(TestResult {
        name: "movement_blocked_self_clears".into(),
        passed: r.blocked() == 1 && groups[0].region == 1 && groups[0].target.is_none(),
        detail: "unreachable order cleared after one tick, position kept".into(),
    });

    // Idle groups never change.
    let mut idle = vec![
        MobileGroup::new("a", "Blue", "f1", 1),
        MobileGroup::new("b", "Red", "f2", 4),
    ];
    let before = idle.clone();
    let any_changed = (0..10).any(|_| movement::tick(&mut idle, &nav).changed());
    results.push(TestResult {
        name: "movement_idle_unchanged".into(),
        passed: !any_changed && idle == before,
        detail: "10 ticks over idle groups report no change".into(),
    });

    // Unknown ids are ignored.
    let updated = movement::issue_move(&mut idle, &["a".into(), "ghost".into()], 2);
    results.push(TestResult {
        name: "movement_unknown_ids_ignored".into(),
        passed: updated == 1,
        detail: format!("{} of 2 ids matched", updated),
    });

    results
}

// ── 5. Session ──────────────────────────────────────────────────────────

fn validate_session(scenario: &Scenario, verbose: bool) -> Vec<TestResult> {
    println!("--- Session ---");
    let mut results = Vec::new();
    let mut session = Session::from_scenario(scenario);

    // Foreground sequence running: ticks and orders are suppressed.
    session.set_blocked(true);
    let landing = movement::select_from_stack(session.groups(), 121, "NATO", 4);
    let ignored = session.issue_move(&landing, 107);
    let quiet = !session.tick().changed();
    results.push(TestResult {
        name: "session_blocked".into(),
        passed: ignored == 0 && quiet && session.ticks() == 0,
        detail: "orders and ticks suppressed while blocked".into(),
    });
    session.set_blocked(false);

    // Landing force marches on Tehran.
    session.issue_move(&landing, 107);
    let hops = session.nav().hop_distance(121, 107);
    let mut ticks = 0;
    while session.tick().changed() && ticks < 100 {
        ticks += 1;
    }
    let all_there = landing
        .iter()
        .all(|id| session.group(id).map(|g| g.region == 107 && g.target.is_none()) == Some(true));
    if verbose {
        println!("    121→107: {:?} hops, quiet after {} ticks", hops, ticks);
    }
    results.push(TestResult {
        name: "session_landing_reaches_tehran".into(),
        passed: all_there && hops.map(|h| h as u64 + 1) == Some(ticks),
        detail: format!("{} groups arrived after {} ticks", landing.len(), ticks),
    });

    results
}

// ── 6. Degenerate inputs ────────────────────────────────────────────────

fn validate_degenerate_inputs(_verbose: bool) -> Vec<TestResult> {
    println!("--- Degenerate Inputs ---");
    let mut results = Vec::new();
    let settings = MapSettings::default();

    let empty = partition::generate(&[], &settings);
    results.push(TestResult {
        name: "degenerate_no_seeds".into(),
        passed: !empty.is_ready() && empty.territory_borders.is_empty(),
        detail: "no seeds → empty, not ready".into(),
    });

    let mut rng = StdRng::seed_from_u64(1);
    let one = scatter_seeds(1, 2000.0, 1200.0, 0.0, &mut rng);
    let single = partition::generate(&one, &settings);
    results.push(TestResult {
        name: "degenerate_single_seed".into(),
        passed: single.len() == 1 && single.regions[0].neighbors.is_empty(),
        detail: "one seed → one isolated region".into(),
    });

    let mut twins = scatter_seeds(3, 2000.0, 1200.0, 100.0, &mut rng);
    twins[1].x = twins[0].x;
    twins[1].y = twins[0].y;
    let twin_partition = partition::generate(&twins, &settings);
    let twin_id = twins[1].id;
    let twin_isolated = twin_partition
        .region(twin_id)
        .map(|r| r.neighbors.is_empty())
        .unwrap_or(false);
    let nav = twin_partition.nav_graph();
    results.push(TestResult {
        name: "degenerate_coincident_seeds".into(),
        passed: twin_partition.len() == 3
            && twin_isolated
            && nav.next_hop(twins[0].id, twin_id) == twins[0].id,
        detail: "coincident seed kept as an isolated region".into(),
    });

    results
}

// ── 7. Random sweep ─────────────────────────────────────────────────────

fn validate_random_sweep(runs: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Random Sweep ({} maps) ---", runs);
    let mut results = Vec::new();
    let settings = MapSettings::default();
    let mut failures = Vec::new();
    let mut total_regions = 0;

    for seed in 0..runs {
        let mut rng = StdRng::seed_from_u64(seed);
        let count = 5 + (seed as usize * 13) % 120;
        let seeds = scatter_seeds(
            count,
            settings.canvas.width,
            settings.canvas.height,
            20.0,
            &mut rng,
        );
        let partition = partition::generate(&seeds, &settings);
        total_regions += partition.len();
        let findings = validation::validate_all(&partition.regions, &seeds);
        let errors = validation::errors_only(&findings);
        if !errors.is_empty() {
            failures.push(format!("seed {}: {}", seed, errors[0].message));
        }
        if verbose {
            println!(
                "    seed {:>3}: {:>3} regions, {} findings",
                seed,
                partition.len(),
                findings.len()
            );
        }
    }

    results.push(TestResult {
        name: "sweep_invariants".into(),
        passed: failures.is_empty(),
        detail: if failures.is_empty() {
            format!("{} maps, {} regions, all valid", runs, total_regions)
        } else {
            format!("{} failing maps, first: {}", failures.len(), failures[0])
        },
    });

    results
}
