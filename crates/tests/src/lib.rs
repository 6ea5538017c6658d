
#[cfg(test)]
mod member_state_tests;
#[cfg(test)]
mod room_tests;
#[cfg(test)]
mod reset_tests;
#[cfg(test)]
mod permission_tests;
#[cfg(test)]
mod mongo_tests;
