use redlog::{Classification, DataClassification, Structured};

struct PersonalData;

impl DataClassification for PersonalData {
    const CLASSIFICATION: Classification = Classification::new("MyTaxonomy", "MyClassification");
}

struct NotLoggable;

#[derive(Structured)]
#[log(rename = "Account", rename_all = "camelCase")]
struct AccountRecord {
    account_id: u64,
    #[log(rename = "owner")]
    #[sensitive(PersonalData)]
    r#owner_name: String,
    #[log(skip)]
    cache: NotLoggable,
}

#[derive(Structured)]
#[log(skip_debug)]
struct Credentials {
    #[sensitive(PersonalData, redlog::Secret)]
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credentials")
    }
}

fn assert_structured<T: Structured>() {}

fn main() {
    assert_structured::<AccountRecord>();
    assert_structured::<Credentials>();
}
