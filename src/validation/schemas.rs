// Request schemas for every body and query the API accepts.

use super::schema::{Format, Property, Schema};

fn company_fields(schema: Schema) -> Schema {
    schema
        .property(Property::string("name").length(1, 50))
        .property(Property::string("description"))
        .property(Property::integer("numEmployees").minimum(0))
        .property(Property::string("logoUrl").format(Format::Uri))
}

pub fn company_new() -> Schema {
    company_fields(Schema::new("companyNew").property(Property::string("handle").length(1, 25)))
        .required(&["handle", "name"])
}

/// Omits `handle`, which never changes.
pub fn company_update() -> Schema {
    company_fields(Schema::new("companyUpdate"))
}

pub fn company_search() -> Schema {
    Schema::new("companySearch")
        .property(Property::string("name").min_length(1))
        .property(Property::integer("minEmployees").minimum(0))
        .property(Property::integer("maxEmployees").minimum(0))
}

fn profile_fields(schema: Schema) -> Schema {
    schema
        .property(Property::string("password").length(5, 20))
        .property(Property::string("firstName").length(1, 30))
        .property(Property::string("lastName").length(1, 30))
        .property(Property::string("email").length(6, 60).format(Format::Email))
}

pub fn user_register() -> Schema {
    profile_fields(Schema::new("userRegister").property(Property::string("username").length(1, 30)))
        .required(&["username", "password", "firstName", "lastName", "email"])
}

pub fn user_new() -> Schema {
    let mut schema = user_register().property(Property::boolean("isAdmin"));
    schema.name = "userNew";
    schema
}

/// Omits `username`, which never changes.
pub fn user_update() -> Schema {
    profile_fields(Schema::new("userUpdate")).property(Property::boolean("isAdmin"))
}

pub fn user_auth() -> Schema {
    Schema::new("userAuth")
        .property(Property::string("username").min_length(1))
        .property(Property::string("password").min_length(1))
        .required(&["username", "password"])
}
