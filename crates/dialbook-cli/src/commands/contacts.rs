use crate::commands::{print_json, Context};
use crate::error::{invalid_input, not_found};
use anyhow::Result;
use clap::Args;
use dialbook_core::dto::{ContactDetailDto, ContactListItemDto};
use tracing::debug;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Match against names and phone numbers; punctuation in numbers is ignored
    #[arg(long, short)]
    pub query: Option<String>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: String,
    /// Query to apply to the session before selecting
    #[arg(long, short)]
    pub query: Option<String>,
}

pub fn list_contacts(ctx: &mut Context<'_>, args: ListArgs) -> Result<()> {
    ctx.session.set_query(args.query.unwrap_or_default());
    let items: Vec<ContactListItemDto> = ctx
        .session
        .filtered()
        .map(ContactListItemDto::from)
        .collect();

    if ctx.json {
        print_json(&items)?;
        return Ok(());
    }

    if items.is_empty() {
        println!("no contacts");
        return Ok(());
    }

    let display = &ctx.config.display;
    for item in items {
        let name = if item.name.is_empty() {
            display.no_name_label.as_str()
        } else {
            item.name.as_str()
        };
        let phone = item
            .primary_phone
            .as_deref()
            .unwrap_or(display.placeholder.as_str());
        println!("{}  {}  {}  {}", item.id, item.initials, name, phone);
    }

    Ok(())
}

pub fn show_contact(ctx: &mut Context<'_>, args: ShowArgs) -> Result<()> {
    if args.id.trim().is_empty() {
        return Err(invalid_input("contact id cannot be empty"));
    }
    if let Some(query) = args.query {
        ctx.session.set_query(query);
        debug!(
            query = ctx.session.query(),
            matches = ctx.session.filtered_len(),
            "query applied"
        );
    }
    ctx.session.set_selected(Some(args.id.as_str()))?;
    let contact = ctx
        .session
        .selected()
        .ok_or_else(|| not_found("contact not found"))?;
    let detail = ContactDetailDto::from(contact);

    if ctx.json {
        print_json(&detail)?;
        return Ok(());
    }

    let display = &ctx.config.display;
    println!("id: {}", detail.id);
    println!(
        "name: {}",
        contact.display_name(display.no_name_label.as_str())
    );
    print_section("phones", &detail.phones, &display.placeholder);
    print_section("emails", &detail.emails, &display.placeholder);
    Ok(())
}

fn print_section(title: &str, values: &[String], placeholder: &str) {
    println!("{}:", title);
    if values.is_empty() {
        println!("  {}", placeholder);
        return;
    }
    for value in values {
        println!("  {}", value);
    }
}
