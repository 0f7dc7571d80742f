use channel::{Broker, ChannelSpec, InMemoryBroker, ProducerRecord};
use common::StationId;
use criterion::{Criterion, criterion_group, criterion_main};
use pipeline::StationTable;
use stations::{Station, TransformedStation};

const OUTPUT: &str = "org.chicago.cta.stations";

fn sample_station(id: i64, order: i64) -> Station {
    Station {
        stop_id: id * 10,
        direction_id: "E".to_string(),
        stop_name: "Harlem (Forest Pk-bound)".to_string(),
        station_name: "Harlem/Lake".to_string(),
        station_descriptive_name: "Harlem/Lake (Green Line)".to_string(),
        station_id: StationId::new(id),
        order,
        red: false,
        blue: id % 2 == 0,
        green: id % 2 != 0,
    }
}

/// Populate the output channel with N enriched records.
async fn populate_channel(broker: &InMemoryBroker, n: i64) {
    broker
        .create_channel(&ChannelSpec::new(OUTPUT, 1, 1).compacted())
        .await
        .unwrap();
    for id in 0..n {
        let transformed = TransformedStation::from_station(&sample_station(id, id));
        let record = ProducerRecord::keyed(&transformed.station_id, &transformed).unwrap();
        broker.publish(OUTPUT, record).await.unwrap();
    }
}

fn bench_enrichment(c: &mut Criterion) {
    let station = sample_station(40850, 1);

    c.bench_function("pipeline/enrich_station", |b| {
        b.iter(|| TransformedStation::from_station(std::hint::black_box(&station)));
    });
}

fn bench_rebuild_1000_records(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let broker = InMemoryBroker::new();

    rt.block_on(populate_channel(&broker, 1000));

    c.bench_function("pipeline/rebuild_1000_records", |b| {
        b.iter(|| {
            rt.block_on(async {
                let table = StationTable::new();
                table.rebuild(&broker, OUTPUT).await.unwrap();
            });
        });
    });
}

criterion_group!(benches, bench_enrichment, bench_rebuild_1000_records);
criterion_main!(benches);
