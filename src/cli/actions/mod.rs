pub mod submit;
pub mod token;

#[derive(Debug)]
pub enum Action {
    Submit(submit::Args),
    Token(token::Args),
    Logout(token::Args),
}
