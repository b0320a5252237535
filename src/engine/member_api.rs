use async_trait::async_trait;
use uuid::Uuid;

use super::Engine;

use crate::{
    api::MemberAPI,
    auth::{Role, User},
    entities::{Member, NewMember},
    error::Error,
};

#[async_trait]
impl MemberAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_member(&self, user: User, params: NewMember) -> Result<Member, Error> {
        if user.role == Role::System {
            return Err(Error::unauthorized_error());
        }

        let member = Member::new(&user, params)?;

        self.store.insert_member(&member).await?;

        Ok(member)
    }

    #[tracing::instrument(skip(self))]
    async fn find_member(&self, _user: User, id: Uuid) -> Result<Member, Error> {
        self.store
            .find_member(id)
            .await?
            .ok_or_else(|| Error::not_found_error(format!("no member found with id {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use tokio_test::block_on;

    fn params() -> NewMember {
        NewMember {
            name: "Sarah Ali".into(),
            email: "sarah@example.com".into(),
            phone: None,
        }
    }

    #[test]
    fn create_and_find_member() {
        let e = Engine::new(MemoryStore::new()).unwrap();
        let user = User::new(Uuid::new_v4(), Role::Customer);

        let member = block_on(e.create_member(user.clone(), params())).unwrap();
        assert_eq!(member.id, user.id);

        let found = block_on(e.find_member(user.clone(), user.id)).unwrap();
        assert_eq!(found, member);

        let err = block_on(e.create_member(user.clone(), params())).unwrap_err();
        assert!(err.is_invalid_state_error());

        let err = block_on(e.find_member(user.clone(), Uuid::new_v4())).unwrap_err();
        assert!(err.is_not_found_error());
    }

    #[test]
    fn system_users_have_no_profile() {
        let e = Engine::new(MemoryStore::new()).unwrap();

        let err = block_on(e.create_member(User::new_system_user(), params())).unwrap_err();
        assert!(err.is_unauthorized_error());
    }
}
