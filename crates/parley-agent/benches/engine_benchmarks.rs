//! Benchmarks for parley-agent.

use std::sync::Arc;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use parley_agent::{
    ActionKind, BidSpaceSampler, EngineConfig, Message, NashBidOptimizer, OpponentModel,
    OpponentTable, SearchConfig, StrategyController,
};
use parley_core::{
    AdditiveUtilitySpace, Domain, Issue, ManualTimeline, PartyId, SortedOutcomeSpace,
};

const ISSUES: u32 = 5;
const VALUES: u32 = 6;

/// 5 issues x 6 values, 7776 outcomes.
fn space() -> AdditiveUtilitySpace {
    let issues = (1..=ISSUES)
        .map(|n| {
            Issue::new(
                n,
                format!("issue-{n}"),
                (0..VALUES).map(|v| format!("v{v}")),
            )
        })
        .collect();
    let domain = Domain::new(issues).unwrap();

    let mut builder = AdditiveUtilitySpace::builder(domain);
    for n in 1..=ISSUES {
        builder = builder.weight(n, f64::from(n));
        for v in 0..VALUES {
            let eval = f64::from((v + n) % VALUES) / f64::from(VALUES - 1);
            builder = builder.evaluation(n, format!("v{v}"), eval);
        }
    }
    builder.build().unwrap()
}

fn opponents(space: &AdditiveUtilitySpace, offers: usize) -> OpponentTable {
    let mut rng = StdRng::seed_from_u64(11);
    let domain = parley_core::UtilitySpace::domain(space);
    let mut table = OpponentTable::new();
    for name in ["alice", "bob"] {
        let first = domain.random_bid(&mut rng);
        let mut model = OpponentModel::new(&first).unwrap();
        for _ in 0..offers {
            model.record_offer(domain.random_bid(&mut rng));
        }
        table.insert(PartyId::from(name), model);
    }
    table
}

fn benchmark_refresh_round(c: &mut Criterion) {
    let space = space();
    let index = SortedOutcomeSpace::new(&space).unwrap();
    let table = opponents(&space, 50);
    let sampler = BidSpaceSampler::new(&space, &index, 50);

    c.bench_function("refresh_round_100_samples", |b| {
        let mut optimizer = NashBidOptimizer::new(SearchConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| {
            let _ = optimizer.refresh_round(black_box(0.8), &sampler, &table, &mut rng);
        });
    });
}

fn benchmark_record_offer(c: &mut Criterion) {
    let space = space();
    let table = opponents(&space, 200);
    let model = table.values().next().cloned().unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let offer = parley_core::UtilitySpace::domain(&space).random_bid(&mut rng);

    c.bench_function("record_offer_200_history", |b| {
        b.iter_batched(
            || model.clone(),
            |mut m| m.record_offer(black_box(offer.clone())),
            BatchSize::SmallInput,
        );
    });
}

fn benchmark_bargaining_turn(c: &mut Criterion) {
    let space = space();
    let index = SortedOutcomeSpace::new(&space).unwrap();
    let domain = parley_core::UtilitySpace::domain(&space).clone();
    let clock = Arc::new(ManualTimeline::at(0.6));
    let mut controller = StrategyController::new(
        space,
        index,
        Arc::clone(&clock),
        EngineConfig::default().with_seed(9),
    )
    .unwrap();
    let mut rng = StdRng::seed_from_u64(3);

    c.bench_function("bargaining_turn", |b| {
        b.iter(|| {
            controller
                .on_message(
                    PartyId::from("opponent"),
                    Message::Offer(domain.random_bid(&mut rng)),
                )
                .unwrap();
            black_box(
                controller
                    .decide(&[ActionKind::Accept, ActionKind::Offer])
                    .unwrap(),
            );
        });
    });
}

criterion_group!(
    benches,
    benchmark_refresh_round,
    benchmark_record_offer,
    benchmark_bargaining_turn,
);
criterion_main!(benches);
