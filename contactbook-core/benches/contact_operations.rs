use contactbook_core::core_directory::{ContactContainer, RecordKey};
use contactbook_core::core_identity::{AgentId, GroupId};
use contactbook_core::test_utils::TestWorld;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;
use tokio::runtime::Runtime;

fn container_with(size: usize) -> ContactContainer {
    let mut cc = ContactContainer::new();
    for i in 0..size {
        cc.add_contact(AgentId::new(format!("{:064x}", i)));
        if i % 10 == 0 {
            cc.add_group(format!("group-{}", i), GroupId::new(format!("group-id-{}", i)));
        }
    }
    cc
}

fn bench_container_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("container_codec");
    let key = RecordKey::new("bench");

    for size in [10, 100, 1000] {
        let cc = container_with(size);
        let bytes = cc.to_bytes().unwrap();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("encode", size), &cc, |b, cc| {
            b.iter(|| black_box(cc.to_bytes().unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &bytes, |b, bytes| {
            b.iter(|| black_box(ContactContainer::from_bytes(&key, bytes).unwrap()));
        });
    }

    group.finish();
}

fn bench_service_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("contact_service");
    group.measurement_time(Duration::from_secs(5));

    let runtime = Runtime::new().unwrap();
    let world = runtime.block_on(TestWorld::new());
    let service = world.service();

    // Already-present adds exercise a full fetch-decode round without a write
    runtime.block_on(async { service.add_contact(&world.adam, "eve").await.unwrap() });
    group.bench_function("add_contact_already_present", |b| {
        b.to_async(&runtime)
            .iter(|| async { black_box(service.add_contact(&world.adam, "eve").await.unwrap()) });
    });

    group.bench_function("join_leave_address_book", |b| {
        b.to_async(&runtime).iter(|| async {
            service.join_address_book(&world.eve).await.unwrap();
            black_box(service.leave_address_book(&world.eve).await.unwrap())
        });
    });

    for size in [10, 100] {
        let owner = runtime.block_on(async {
            let owner = world.resolver.register_user(&format!("owner-{}", size)).await;
            for i in 0..size {
                let login = format!("contact-{}-{}", size, i);
                world.resolver.register_user(&login).await;
                service.add_contact(&owner, &login).await.unwrap();
            }
            owner
        });
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("list_contacts", size), &owner, |b, owner| {
            b.to_async(&runtime)
                .iter(|| async { black_box(service.list_contacts(owner).await.unwrap()) });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_container_codec, bench_service_operations);
criterion_main!(benches);
