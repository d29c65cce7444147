use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    pub fn cat_file(&mut self, object_id: &str) -> anyhow::Result<()> {
        let oid = ObjectId::try_parse(object_id.to_string())?;
        let object = self.database().load_any(&oid)?;

        write!(self.writer(), "{}", object.display())?;

        Ok(())
    }
}
