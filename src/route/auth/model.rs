use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Validate, JsonSchema)]
pub struct SignupInput {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 1, max = 128))]
	pub password: String,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct LoginInput {
	#[validate(length(min = 1))]
	pub email: String,
	#[validate(length(min = 1, max = 128))]
	pub password: String,
}

#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupOutput {
	/// The id of the newly created user.
	pub user_id: Uuid,
}

#[derive(Serialize, JsonSchema)]
pub struct LoginOutput {
	/// The email of the signed-in user.
	pub email: String,
}

#[derive(Serialize, JsonSchema)]
pub struct LogoutOutput {
	pub message: &'static str,
}
