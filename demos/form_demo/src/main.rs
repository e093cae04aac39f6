use reform_core::Scope;
use reform_form::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Serialize, Deserialize)]
struct Signup {
    email: String,
    newsletter: bool,
    address: Address,
}

#[derive(Debug, Serialize, Deserialize)]
struct Address {
    city: String,
    zip: String,
}

fn signup_page(scope: &Scope) -> anyhow::Result<FormState> {
    let initial = Signup {
        email: String::new(),
        newsletter: false,
        address: Address {
            city: String::new(),
            zip: String::new(),
        },
    };
    let opts = FormOptions::default().storage(StorageKind::Local);
    Ok(scope.run(|| FormState::from_serialize(&initial, opts))?)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    with_host(Host::in_memory("/signup?step=1"), || -> anyhow::Result<()> {
        // First visit: the user types, then navigates away.
        let page = Scope::new();
        let form = signup_page(&page)?;
        form.set_field_value("email", "ada@example.com");
        form.set_fields_value(&json!({"address": {"city": "London"}}));
        log::info!("editing: {:?}", form.values_as::<Signup>()?);
        page.dispose();

        // Second visit: the draft comes back.
        let page = Scope::new();
        let form = signup_page(&page)?;
        let draft: Signup = form.values_as()?;
        log::info!("restored draft: {draft:?}");
        println!("restored email = {}", draft.email);

        // Submitted: start over and leave no draft behind.
        form.reset();
        println!("after reset    = {:?}", form.get_field_value("email"));
        page.dispose();
        form.clear_cache();
        Ok(())
    })
}
