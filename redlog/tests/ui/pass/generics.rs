use std::marker::PhantomData;

use redlog::{Classification, DataClassification, Structured};

struct Secret;

impl DataClassification for Secret {
    const CLASSIFICATION: Classification = Classification::new("MyTaxonomy", "Secret");
}

// Neither marker implements `LogField` or `Debug`.
struct UserMarker;
struct OrderMarker;

#[derive(Structured)]
struct TypedId<T> {
    id: u64,
    marker: PhantomData<T>,
}

#[derive(Structured)]
struct Envelope<P, M> {
    #[sensitive(Secret)]
    payload: P,
    label: &'static str,
    _marker: PhantomData<M>,
}

#[derive(Structured)]
struct Holder<'a, T> {
    #[sensitive]
    inner: &'a T,
}

fn assert_structured<T: Structured>() {}

fn main() {
    assert_structured::<TypedId<UserMarker>>();
    assert_structured::<Envelope<String, OrderMarker>>();
    assert_structured::<Holder<'static, TypedId<OrderMarker>>>();
}
