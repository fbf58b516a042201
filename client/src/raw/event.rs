use autoriza_shared::event::{handle::EventDescriptor, Event};
use reqwest::{Method, RequestBuilder, Response};

use crate::Error;

/// Events visible to the logged-in staff member.
pub struct List;

#[async_trait::async_trait]
impl super::Request for List {
    type Output = Vec<Event>;

    fn url_suffix(&self) -> String {
        "/eventos/".to_owned()
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error> {
        super::json(response).await
    }
}

pub struct View {
    pub id: u64,
}

#[async_trait::async_trait]
impl super::Request for View {
    type Output = Event;

    fn url_suffix(&self) -> String {
        format!("/eventos/{}", self.id)
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error> {
        super::json(response).await
    }
}

pub struct Create {
    pub descriptor: EventDescriptor,
}

#[async_trait::async_trait]
impl super::Request for Create {
    type Output = Event;
    const METHOD: Method = Method::POST;

    fn url_suffix(&self) -> String {
        "/eventos/".to_owned()
    }

    fn make_req(&self, req: RequestBuilder) -> Result<RequestBuilder, Error> {
        Ok(req.json(&self.descriptor))
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error> {
        super::json(response).await
    }
}

pub struct Update {
    pub id: u64,
    pub descriptor: EventDescriptor,
}

#[async_trait::async_trait]
impl super::Request for Update {
    type Output = Event;
    const METHOD: Method = Method::PUT;

    fn url_suffix(&self) -> String {
        format!("/eventos/{}", self.id)
    }

    fn make_req(&self, req: RequestBuilder) -> Result<RequestBuilder, Error> {
        Ok(req.json(&self.descriptor))
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error> {
        super::json(response).await
    }
}

pub struct Delete {
    pub id: u64,
}

#[async_trait::async_trait]
impl super::Request for Delete {
    type Output = ();
    const METHOD: Method = Method::DELETE;

    fn url_suffix(&self) -> String {
        format!("/eventos/{}", self.id)
    }

    async fn parse_res(&mut self, _response: Response) -> Result<Self::Output, Error> {
        Ok(())
    }
}

/// Events open to the public, optionally scoped to a campus.
pub struct ListPublic {
    pub campus_id: Option<u64>,
}

#[async_trait::async_trait]
impl super::Request for ListPublic {
    type Output = Vec<Event>;

    fn url_suffix(&self) -> String {
        "/eventos/publicos".to_owned()
    }

    fn make_req(&self, req: RequestBuilder) -> Result<RequestBuilder, Error> {
        Ok(match self.campus_id {
            Some(campus_id) => req.query(&[("campus_id", campus_id)]),
            None => req,
        })
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error> {
        super::json(response).await
    }
}

/// An event looked up by its public unique link.
pub struct ViewPublic {
    pub link: String,
}

#[async_trait::async_trait]
impl super::Request for ViewPublic {
    type Output = Event;

    fn url_suffix(&self) -> String {
        format!("/eventos/publico/{}", self.link)
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error> {
        super::json(response).await
    }
}

/// The permission-slip template participants print and sign.
pub struct Template {
    pub id: u64,
}

#[async_trait::async_trait]
impl super::Request for Template {
    type Output = bytes::Bytes;

    fn url_suffix(&self) -> String {
        format!("/eventos/{}/modelo/", self.id)
    }

    fn make_req(&self, req: RequestBuilder) -> Result<RequestBuilder, Error> {
        Ok(req.query(&[("evento_id", self.id)]))
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error> {
        Ok(response.bytes().await?)
    }
}
