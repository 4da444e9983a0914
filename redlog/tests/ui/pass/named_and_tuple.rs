use redlog::{Classification, DataClassification, Structured};

struct PersonalData;

impl DataClassification for PersonalData {
    const CLASSIFICATION: Classification = Classification::new("MyTaxonomy", "MyClassification");
}

#[derive(Structured)]
struct Address {
    city: String,
    #[sensitive(PersonalData)]
    street: String,
}

#[derive(Structured)]
struct Person {
    id: u64,
    #[sensitive(PersonalData)]
    name: String,
    #[sensitive]
    address: Address,
    nickname: Option<String>,
}

#[derive(Structured)]
struct Pair(#[sensitive(PersonalData)] String, u32);

#[derive(Structured)]
struct Empty;

fn assert_structured<T: Structured>() {}

fn main() {
    assert_structured::<Person>();
    assert_structured::<Pair>();
    assert_structured::<Empty>();
    let _ = format!("{:?} {:?}", Pair("x".into(), 1), Empty);
}
